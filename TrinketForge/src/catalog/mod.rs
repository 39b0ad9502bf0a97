//! Reference-data catalog
//!
//! Loads the immutable reference data every other component validates
//! against:
//! - stat names with engine field mappings, units and bounds
//! - hero classes
//! - rarity tiers with prices
//! - rarities and trinket ids shipped with the base game
//!
//! The catalog is built once per run and shared by reference; nothing mutates
//! it afterwards.

mod loader;
mod types;

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};

use crate::error::Result;

pub use loader::{
    load_bounds_text, load_hero_classes, load_rarities, load_stat_definitions,
    load_vanilla_rarities, load_vanilla_trinket_ids,
};
pub use types::{
    ClassRestriction, MagnitudeUnit, RaritySpec, StatDefinition, UNIVERSAL_AWARD_CATEGORY,
};

/// Where the catalog's reference files live.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    /// `{"effects": [{"name", "min", "max"}]}`
    pub stat_bounds: PathBuf,
    /// `{"<stat>": [{"stat_type", "stat_subtype", "magnitude_type"}]}`
    pub effect_types: PathBuf,
    /// `{"hero_class_requirements": [...], "rarity": {"<tier>": price}}`
    pub trinket_properties: PathBuf,
    /// `{"rarities": [{"id", "award_category"}]}`
    pub vanilla_rarities: Option<PathBuf>,
    /// `{"entries": [{"id"}]}`
    pub vanilla_entries: Option<PathBuf>,
}

/// Immutable reference data for one synthesis run.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    stats: IndexMap<String, StatDefinition>,
    hero_classes: IndexSet<String>,
    rarities: IndexMap<String, RaritySpec>,
    vanilla_rarities: IndexMap<String, RaritySpec>,
    vanilla_trinket_ids: Vec<String>,
    bounds_text: String,
}

impl SchemaCatalog {
    /// Load every reference file.
    ///
    /// # Errors
    /// Returns [`crate::Error::ConfigLoad`] if any file is missing or malformed.
    pub fn load(sources: &CatalogSources) -> Result<Self> {
        tracing::info!("Loading catalog from {:?}", sources.stat_bounds.parent());
        let stats = load_stat_definitions(&sources.stat_bounds, &sources.effect_types)?;
        let hero_classes = load_hero_classes(&sources.trinket_properties)?;
        let vanilla_rarities = load_vanilla_rarities(sources.vanilla_rarities.as_deref())?;
        let rarities = load_rarities(&sources.trinket_properties, &vanilla_rarities)?;
        let vanilla_trinket_ids = load_vanilla_trinket_ids(sources.vanilla_entries.as_deref())?;
        let bounds_text = load_bounds_text(&sources.stat_bounds)?;

        tracing::info!(
            "Catalog: {} stats, {} classes, {} rarities ({} vanilla)",
            stats.len(),
            hero_classes.len(),
            rarities.len(),
            vanilla_rarities.len()
        );

        Ok(Self {
            stats,
            hero_classes,
            rarities,
            vanilla_rarities,
            vanilla_trinket_ids,
            bounds_text,
        })
    }

    /// Build a catalog from in-memory parts.
    #[must_use]
    pub fn from_parts(
        stats: impl IntoIterator<Item = StatDefinition>,
        hero_classes: impl IntoIterator<Item = String>,
        rarities: impl IntoIterator<Item = (String, RaritySpec)>,
        vanilla_rarities: impl IntoIterator<Item = RaritySpec>,
    ) -> Self {
        Self {
            stats: stats.into_iter().map(|s| (s.name.clone(), s)).collect(),
            hero_classes: hero_classes.into_iter().collect(),
            rarities: rarities.into_iter().collect(),
            vanilla_rarities: vanilla_rarities
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
            vanilla_trinket_ids: Vec::new(),
            bounds_text: String::new(),
        }
    }

    /// Look up a stat by exact name.
    #[must_use]
    pub fn stat(&self, name: &str) -> Option<&StatDefinition> {
        self.stats.get(name)
    }

    /// All stat names in catalog order.
    pub fn stat_names(&self) -> impl Iterator<Item = &str> {
        self.stats.keys().map(String::as_str)
    }

    /// All stat definitions in catalog order.
    pub fn stats(&self) -> impl Iterator<Item = &StatDefinition> {
        self.stats.values()
    }

    /// Hero classes from the properties file.
    #[must_use]
    pub fn hero_classes(&self) -> &IndexSet<String> {
        &self.hero_classes
    }

    /// Tokens a class answer may take: every hero class plus `every_class`.
    #[must_use]
    pub fn class_tokens(&self) -> IndexSet<String> {
        let mut tokens = self.hero_classes.clone();
        tokens.insert(ClassRestriction::EVERY_CLASS.to_string());
        tokens
    }

    /// Priced rarity tiers keyed by tier name.
    #[must_use]
    pub fn rarities(&self) -> &IndexMap<String, RaritySpec> {
        &self.rarities
    }

    /// Tier names a rarity answer may take.
    #[must_use]
    pub fn rarity_tiers(&self) -> IndexSet<String> {
        self.rarities.keys().cloned().collect()
    }

    /// Look up a priced tier by name.
    #[must_use]
    pub fn rarity(&self, tier: &str) -> Option<&RaritySpec> {
        self.rarities.get(tier)
    }

    /// Whether a rarity id ships with the base game.
    #[must_use]
    pub fn is_vanilla_rarity(&self, id: &str) -> bool {
        self.vanilla_rarities.contains_key(id)
    }

    /// Base game trinket ids (name examples).
    #[must_use]
    pub fn vanilla_trinket_ids(&self) -> &[String] {
        &self.vanilla_trinket_ids
    }

    /// Compact bounds JSON for the tuning prompt.
    #[must_use]
    pub fn bounds_text(&self) -> &str {
        &self.bounds_text
    }
}
