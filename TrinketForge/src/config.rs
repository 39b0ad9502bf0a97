//! Run configuration (forge.toml)
//!
//! ```toml
//! [resources]
//! stat_bounds = "resources/trinket_effects.json"
//! effect_types = "resources/effect_types.json"
//! trinket_properties = "resources/trinket_properties.json"
//!
//! [output]
//! buffs = "mod/trinkets/modded.buffs.json"
//! entries = "mod/trinkets/modded.entries.trinkets.json"
//! rarities = "mod/trinkets/modded.rarities.trinkets.json"
//! strings = "mod/localization/trinkets.string_table.xml"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSources;
use crate::degrade::DegradePolicy;
use crate::error::{Error, Result};
use crate::generator::GeneratorRole;
use crate::retry::{Backoff, BackoffKind, RetryPolicy};

fn default_image_dir() -> PathBuf {
    PathBuf::from("panels/icons_equip/trinket")
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// The full run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    pub resources: ResourcePaths,
    pub output: OutputPaths,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub policy: PolicySettings,
}

/// Read-only reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePaths {
    pub stat_bounds: PathBuf,
    pub effect_types: PathBuf,
    pub trinket_properties: PathBuf,
    #[serde(default)]
    pub vanilla_rarities: Option<PathBuf>,
    #[serde(default)]
    pub vanilla_entries: Option<PathBuf>,
    /// Frame image installed when the `stochastic` rarity is created
    #[serde(default)]
    pub rarity_frame: Option<PathBuf>,
}

/// Files the run writes to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPaths {
    pub buffs: PathBuf,
    pub entries: PathBuf,
    pub rarities: PathBuf,
    pub strings: PathBuf,
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
}

/// Model and sampling temperature for one generator role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for RoleSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

/// Generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub namer: RoleSettings,
    #[serde(default)]
    pub class_chooser: RoleSettings,
    #[serde(default)]
    pub rarity_chooser: RoleSettings,
    #[serde(default)]
    pub stat_chooser: RoleSettings,
    #[serde(default)]
    pub stat_tuner: RoleSettings,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            namer: RoleSettings::default(),
            class_chooser: RoleSettings::default(),
            rarity_chooser: RoleSettings::default(),
            stat_chooser: RoleSettings::default(),
            stat_tuner: RoleSettings::default(),
        }
    }
}

impl GeneratorSettings {
    /// Settings for one generator role.
    #[must_use]
    pub fn role(&self, role: GeneratorRole) -> &RoleSettings {
        match role {
            GeneratorRole::Namer => &self.namer,
            GeneratorRole::ClassChooser => &self.class_chooser,
            GeneratorRole::RarityChooser => &self.rarity_chooser,
            GeneratorRole::StatChooser => &self.stat_chooser,
            GeneratorRole::StatTuner => &self.stat_tuner,
        }
    }
}

/// Retry bound and backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// 0 retries forever
    #[serde(default)]
    pub max_attempts: u32,
    #[serde(default)]
    pub backoff: BackoffKind,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffKind::None,
            delay_ms: default_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetrySettings {
    #[must_use]
    pub fn to_policy(&self) -> RetryPolicy {
        let delay = Duration::from_millis(self.delay_ms);
        let backoff = match self.backoff {
            BackoffKind::None => Backoff::None,
            BackoffKind::Fixed => Backoff::Fixed(delay),
            BackoffKind::Exponential => Backoff::Exponential {
                base: delay,
                max: Duration::from_millis(self.max_delay_ms),
            },
        };
        RetryPolicy::bounded(self.max_attempts).with_backoff(backoff)
    }
}

/// What to do about degraded values and existing strings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySettings {
    #[serde(default)]
    pub on_degraded: DegradePolicy,
    /// Replace existing rarity names instead of keeping them
    #[serde(default)]
    pub overwrite_rarity_names: bool,
}

impl ForgeConfig {
    /// Load a config file and resolve its relative paths.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::file_io(path, e))?;
        let mut config = Self::from_toml(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_paths(base);
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config without resolving paths.
    ///
    /// # Errors
    /// Returns [`Error::TomlError`] if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        let r = &mut self.resources;
        resolve(&mut r.stat_bounds);
        resolve(&mut r.effect_types);
        resolve(&mut r.trinket_properties);
        for p in [&mut r.vanilla_rarities, &mut r.vanilla_entries, &mut r.rarity_frame]
            .into_iter()
            .flatten()
        {
            resolve(p);
        }
        let o = &mut self.output;
        for p in [&mut o.buffs, &mut o.entries, &mut o.rarities, &mut o.strings, &mut o.image_dir] {
            resolve(p);
        }
    }

    /// Where the catalog reads its reference data.
    #[must_use]
    pub fn catalog_sources(&self) -> CatalogSources {
        CatalogSources {
            stat_bounds: self.resources.stat_bounds.clone(),
            effect_types: self.resources.effect_types.clone(),
            trinket_properties: self.resources.trinket_properties.clone(),
            vanilla_rarities: self.resources.vanilla_rarities.clone(),
            vanilla_entries: self.resources.vanilla_entries.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [resources]
        stat_bounds = "res/trinket_effects.json"
        effect_types = "res/effect_types.json"
        trinket_properties = "/abs/trinket_properties.json"
        rarity_frame = "res/frame.png"

        [output]
        buffs = "out/buffs.json"
        entries = "out/entries.json"
        rarities = "out/rarities.json"
        strings = "out/strings.xml"
    "#;

    #[test]
    fn test_defaults() {
        let config = ForgeConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.generator.endpoint, "http://localhost:11434");
        assert_eq!(config.generator.stat_tuner, RoleSettings::default());
        assert_eq!(config.retry.max_attempts, 0);
        assert_eq!(config.retry.to_policy(), RetryPolicy::unbounded());
        assert_eq!(config.policy.on_degraded, DegradePolicy::Continue);
        assert!(!config.policy.overwrite_rarity_names);
        assert!(config.resources.vanilla_rarities.is_none());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = ForgeConfig::from_toml(MINIMAL).unwrap();
        config.resolve_paths(Path::new("/mods/forge"));
        assert_eq!(
            config.resources.stat_bounds,
            PathBuf::from("/mods/forge/res/trinket_effects.json")
        );
        assert_eq!(
            config.resources.trinket_properties,
            PathBuf::from("/abs/trinket_properties.json")
        );
        assert_eq!(
            config.resources.rarity_frame,
            Some(PathBuf::from("/mods/forge/res/frame.png"))
        );
        assert_eq!(
            config.output.image_dir,
            PathBuf::from("/mods/forge/panels/icons_equip/trinket")
        );
    }

    #[test]
    fn test_retry_section() {
        let toml_str = format!(
            "{MINIMAL}\n[retry]\nmax_attempts = 4\nbackoff = \"exponential\"\ndelay_ms = 100\n\n[policy]\non_degraded = \"abort\"\n"
        );
        let config = ForgeConfig::from_toml(&toml_str).unwrap();
        let policy = config.retry.to_policy();
        assert_eq!(policy.max_attempts, Some(4));
        assert_eq!(policy.backoff.delay(2), Duration::from_millis(200));
        assert_eq!(config.policy.on_degraded, DegradePolicy::Abort);
    }

    #[test]
    fn test_invalid_toml() {
        let err = ForgeConfig::from_toml("[resources").unwrap_err();
        assert!(matches!(err, Error::TomlError(_)));
    }
}
