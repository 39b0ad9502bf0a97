//! Reference-data file loading
//!
//! Every failure here is fatal: a missing or malformed catalog file becomes
//! [`Error::ConfigLoad`].

use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::utils::slugify;

use super::types::{
    EffectBoundsFile, EffectType, EntryIdsFile, MagnitudeUnit, RarityFile, RaritySpec,
    StatDefinition, TrinketPropertiesFile, UNIVERSAL_AWARD_CATEGORY,
};

/// Read and deserialize a JSON reference file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::config_load(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::config_load(path, e))
}

/// Load stat definitions from the bounds file and the effect-type mapping.
///
/// The bounds file decides which stats exist. A stat with no effect-type
/// mapping keeps `None` engine fields and an absolute unit.
pub fn load_stat_definitions(
    bounds_path: &Path,
    effect_types_path: &Path,
) -> Result<IndexMap<String, StatDefinition>> {
    let bounds: EffectBoundsFile = read_json(bounds_path)?;
    let effect_types: IndexMap<String, Vec<EffectType>> = read_json(effect_types_path)?;

    let mut stats = IndexMap::new();
    for effect in bounds.effects {
        let Some(name) = effect.name else {
            continue;
        };
        let mapping = effect_types.get(&name).and_then(|v| v.first());
        let unit = match mapping.and_then(|m| m.magnitude_type.as_deref()) {
            Some("percent") => MagnitudeUnit::Percent,
            _ => MagnitudeUnit::Absolute,
        };
        let definition = StatDefinition {
            name: name.clone(),
            stat_type: mapping.and_then(|m| m.stat_type.clone()),
            stat_subtype: mapping.and_then(|m| m.stat_subtype.clone()),
            unit,
            min: effect.min,
            max: effect.max,
        };
        if mapping.is_none() {
            tracing::warn!("Stat '{}' has no effect-type mapping; engine fields will be null", name);
        }
        stats.insert(name, definition);
    }

    if stats.is_empty() {
        return Err(Error::config_load(bounds_path, "no named effects"));
    }
    tracing::debug!("Loaded {} stat definitions", stats.len());
    Ok(stats)
}

/// Load the hero classes a trinket may be restricted to.
pub fn load_hero_classes(properties_path: &Path) -> Result<IndexSet<String>> {
    let properties: TrinketPropertiesFile = read_json(properties_path)?;
    Ok(properties.hero_class_requirements.into_iter().collect())
}

/// Load the priced rarity tiers.
///
/// Award categories come from the vanilla rarity list when the tier is known
/// there, otherwise the tier is treated as universal.
pub fn load_rarities(
    properties_path: &Path,
    vanilla: &IndexMap<String, RaritySpec>,
) -> Result<IndexMap<String, RaritySpec>> {
    let properties: TrinketPropertiesFile = read_json(properties_path)?;
    if properties.rarity.is_empty() {
        return Err(Error::config_load(properties_path, "rarity table is empty"));
    }
    Ok(properties
        .rarity
        .into_iter()
        .map(|(tier, price)| {
            let id = slugify(&tier);
            let award_category = vanilla.get(&id).map_or_else(
                || UNIVERSAL_AWARD_CATEGORY.to_string(),
                |v| v.award_category.clone(),
            );
            (
                tier,
                RaritySpec {
                    id,
                    price,
                    award_category,
                },
            )
        })
        .collect())
}

/// Load the rarities shipped with the base game. A missing path means none.
pub fn load_vanilla_rarities(path: Option<&Path>) -> Result<IndexMap<String, RaritySpec>> {
    let Some(path) = path else {
        return Ok(IndexMap::new());
    };
    let file: RarityFile = read_json(path)?;
    Ok(file.rarities.into_iter().map(|r| (r.id.clone(), r)).collect())
}

/// Load the ids of the base game's trinkets (name examples for prompts).
pub fn load_vanilla_trinket_ids(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let file: EntryIdsFile = read_json(path)?;
    let ids: IndexSet<String> = file.entries.into_iter().map(|e| e.id).collect();
    Ok(ids.into_iter().collect())
}

/// Load the bounds file as compact JSON for the tuning prompt.
///
/// Mirrors the layout the tuner was written against: no padding except a
/// single space after `,` and `:` when not followed by a digit or space.
pub fn load_bounds_text(bounds_path: &Path) -> Result<String> {
    let value: serde_json::Value = read_json(bounds_path)?;
    let compact = serde_json::to_string(&value)?;
    let mut out = String::with_capacity(compact.len() + compact.len() / 8);
    let mut chars = compact.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, ',' | ':')
            && chars
                .peek()
                .is_some_and(|next| !next.is_ascii_digit() && !next.is_whitespace())
        {
            out.push(' ');
        }
    }
    Ok(out)
}
