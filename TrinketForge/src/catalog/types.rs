//! Type definitions for the reference-data catalog

use serde::{Deserialize, Serialize};

/// Award category given to rarities created by this tool.
pub const UNIVERSAL_AWARD_CATEGORY: &str = "universal";

/// How a stat's magnitude is expressed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeUnit {
    /// Authored as whole percent, stored as a fraction (`15` → `0.15`).
    Percent,
    /// Stored as authored.
    #[default]
    Absolute,
}

/// One allowed stat and its engine mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDefinition {
    /// Human-readable name, matched exactly (e.g., "Bleed Resist")
    pub name: String,
    /// Engine field category (e.g., "resistance")
    pub stat_type: Option<String>,
    /// Engine field subcategory (e.g., "bleed")
    pub stat_subtype: Option<String>,
    /// Magnitude unit
    pub unit: MagnitudeUnit,
    /// Lowest magnitude the generator should pick
    pub min: Option<f64>,
    /// Highest magnitude the generator should pick
    pub max: Option<f64>,
}

impl StatDefinition {
    /// Whether `value` lies inside the authored bounds. Missing bounds are open.
    #[must_use]
    pub fn within_bounds(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A rarity tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaritySpec {
    /// Tier identifier (slug form)
    pub id: String,
    /// Shop price of trinkets in this tier
    #[serde(skip)]
    pub price: u32,
    /// Award category used by the engine's loot tables
    pub award_category: String,
}

impl RaritySpec {
    /// A rarity created by this tool: slugged id, universal award category.
    #[must_use]
    pub fn created(tier: &str, price: u32) -> Self {
        Self {
            id: crate::utils::slugify(tier),
            price,
            award_category: UNIVERSAL_AWARD_CATEGORY.to_string(),
        }
    }
}

/// Class restriction of a trinket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRestriction {
    /// Usable by every hero class
    Any,
    /// Usable only by this class
    Only(String),
}

impl ClassRestriction {
    /// Token the generator answers with for unrestricted trinkets.
    pub const EVERY_CLASS: &'static str = "every_class";

    /// Interpret a validated class token.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token == Self::EVERY_CLASS {
            Self::Any
        } else {
            Self::Only(token.to_string())
        }
    }

    /// The `hero_class_requirements` list written to the entry.
    #[must_use]
    pub fn requirements(&self) -> Vec<String> {
        match self {
            Self::Any => Vec::new(),
            Self::Only(class) => vec![class.clone()],
        }
    }

    /// Human-readable form for prompts ("every class", "plague doctor").
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Any => Self::EVERY_CLASS.replace('_', " "),
            Self::Only(class) => class.replace('_', " "),
        }
    }
}

// ==================== On-disk shapes ====================

/// Stat bounds file (`{"effects": [...]}`)
#[derive(Debug, Deserialize)]
pub(crate) struct EffectBoundsFile {
    pub effects: Vec<EffectBounds>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EffectBounds {
    pub name: Option<String>,
    #[serde(default, alias = "minimum", alias = "min_value")]
    pub min: Option<f64>,
    #[serde(default, alias = "maximum", alias = "max_value")]
    pub max: Option<f64>,
}

/// One element of an effect-type entry
#[derive(Debug, Deserialize)]
pub(crate) struct EffectType {
    pub stat_type: Option<String>,
    pub stat_subtype: Option<String>,
    #[serde(default)]
    pub magnitude_type: Option<String>,
}

/// Trinket properties file
#[derive(Debug, Deserialize)]
pub(crate) struct TrinketPropertiesFile {
    pub hero_class_requirements: Vec<String>,
    pub rarity: indexmap::IndexMap<String, u32>,
}

/// Rarity store / vanilla rarity list (`{"rarities": [...]}`)
#[derive(Debug, Deserialize)]
pub(crate) struct RarityFile {
    #[serde(default)]
    pub rarities: Vec<RaritySpec>,
}

/// Vanilla trinket entries, only the ids are read
#[derive(Debug, Deserialize)]
pub(crate) struct EntryIdsFile {
    pub entries: Vec<EntryId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryId {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_restriction() {
        assert_eq!(ClassRestriction::from_token("every_class"), ClassRestriction::Any);
        assert!(ClassRestriction::Any.requirements().is_empty());
        let jester = ClassRestriction::from_token("jester");
        assert_eq!(jester.requirements(), vec!["jester".to_string()]);
        assert_eq!(
            ClassRestriction::from_token("plague_doctor").describe(),
            "plague doctor"
        );
    }

    #[test]
    fn test_bounds() {
        let def = StatDefinition {
            name: "Stress".to_string(),
            stat_type: None,
            stat_subtype: None,
            unit: MagnitudeUnit::Percent,
            min: Some(-30.0),
            max: Some(30.0),
        };
        assert!(def.within_bounds(-30.0));
        assert!(!def.within_bounds(31.0));
    }

    #[test]
    fn test_created_rarity() {
        let spec = RaritySpec::created("Stochastic", 5000);
        assert_eq!(spec.id, "stochastic");
        assert_eq!(spec.award_category, "universal");
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json.get("price").is_none());
    }
}
