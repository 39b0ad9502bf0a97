//! Run context
//!
//! A [`Forge`] binds one loaded [`ForgeConfig`] to the [`SchemaCatalog`] it
//! points at. Both stay immutable for the whole run; assemblers and
//! synthesizers borrow from it.

use std::path::Path;

use crate::assembler::{AssemblyReport, SynthesisProgressCallback, TrinketRecordAssembler};
use crate::catalog::SchemaCatalog;
use crate::config::ForgeConfig;
use crate::error::Result;
use crate::generator::Generator;
use crate::synth::TrinketSynthesizer;

/// Loaded configuration and catalog for one run.
#[derive(Debug, Clone)]
pub struct Forge {
    config: ForgeConfig,
    catalog: SchemaCatalog,
}

impl Forge {
    /// Load the config file and the catalog it references.
    ///
    /// # Errors
    /// Returns an error if the config or any reference file cannot be loaded.
    pub fn open(config_path: &Path) -> Result<Self> {
        let config = ForgeConfig::load(config_path)?;
        Self::from_config(config)
    }

    /// Load the catalog for an already-resolved config.
    ///
    /// # Errors
    /// Returns an error if any reference file cannot be loaded.
    pub fn from_config(config: ForgeConfig) -> Result<Self> {
        let catalog = SchemaCatalog::load(&config.catalog_sources())?;
        Ok(Self { config, catalog })
    }

    #[must_use]
    pub fn new(config: ForgeConfig, catalog: SchemaCatalog) -> Self {
        Self { config, catalog }
    }

    #[must_use]
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Assembler writing to the configured outputs under the configured policy.
    #[must_use]
    pub fn assembler(&self) -> TrinketRecordAssembler<'_> {
        let policy = &self.config.policy;
        TrinketRecordAssembler::new(&self.catalog, &self.config.output)
            .with_rarity_frame(self.config.resources.rarity_frame.as_deref())
            .with_overwrite_rarity_names(policy.overwrite_rarity_names)
            .with_degrade_policy(policy.on_degraded)
    }

    /// Synthesizer using the configured retry policy.
    pub fn synthesizer<G: Generator>(&self, generator: G) -> TrinketSynthesizer<'_, G> {
        TrinketSynthesizer::new(&self.catalog, generator).with_retry(self.config.retry.to_policy())
    }

    /// Synthesize one trinket and write its records.
    ///
    /// # Errors
    /// Returns synthesis or assembly errors; nothing is written if synthesis
    /// fails.
    pub fn generate_one<G: Generator>(
        &self,
        generator: G,
        progress: SynthesisProgressCallback,
    ) -> Result<AssemblyReport> {
        let properties = self.synthesizer(generator).synthesize(progress)?;
        self.assembler().assemble_properties(&properties, progress)
    }
}
