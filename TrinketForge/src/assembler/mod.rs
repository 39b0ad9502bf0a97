//! Trinket record assembly
//!
//! Takes finished trinket properties and writes everything the game needs,
//! in this order:
//! 1. compile stats into buffs
//! 2. append the buffs
//! 3. create the rarity if the mod and base game lack it
//! 4. add the rarity's display name (new rarities only)
//! 5. add the trinket's title string
//! 6. append the trinket entry
//!
//! The tier's price is looked up right after compiling, so an unpriced tier
//! fails before anything is written.
//!
//! Each step only starts once the previous one is on disk, so an entry never
//! references a buff or rarity that was not written.

mod types;

use std::path::{Path, PathBuf};

use crate::catalog::{ClassRestriction, SchemaCatalog};
use crate::compiler::StatCompiler;
use crate::config::OutputPaths;
use crate::degrade::{DegradePolicy, Degradation};
use crate::error::{Error, Result};
use crate::store::{
    BUFF_CATEGORY, ENTRY_CATEGORY, EntryKind, FRAMED_RARITY, LocalizationStore, RarityStore,
    append_records, install_rarity_frame, rarity_string_id, title_string_id,
};
use crate::utils::{display_name, slugify};
use crate::validate::TunedStatSet;

pub use types::{
    AssemblyReport, SynthesisPhase, SynthesisProgress, SynthesisProgressCallback, TrinketEntry,
};

const STEPS: usize = 6;

/// Generated properties of one trinket, ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct TrinketProperties {
    /// Display name
    pub name: String,
    /// Validated class token (`every_class` or a hero class)
    pub class: String,
    /// Validated rarity tier
    pub rarity: String,
    pub stats: TunedStatSet,
    /// Values already replaced before assembly (e.g. tuning fallback)
    pub degradations: Vec<Degradation>,
}

/// Writes a trinket's records into the mod's stores.
#[derive(Debug, Clone)]
pub struct TrinketRecordAssembler<'a> {
    catalog: &'a SchemaCatalog,
    output: &'a OutputPaths,
    rarity_frame: Option<&'a Path>,
    overwrite_rarity_names: bool,
    on_degraded: DegradePolicy,
}

impl<'a> TrinketRecordAssembler<'a> {
    #[must_use]
    pub fn new(catalog: &'a SchemaCatalog, output: &'a OutputPaths) -> Self {
        Self {
            catalog,
            output,
            rarity_frame: None,
            overwrite_rarity_names: false,
            on_degraded: DegradePolicy::Continue,
        }
    }

    /// Frame image installed when the framed rarity is first created.
    #[must_use]
    pub fn with_rarity_frame(mut self, frame: Option<&'a Path>) -> Self {
        self.rarity_frame = frame;
        self
    }

    #[must_use]
    pub fn with_overwrite_rarity_names(mut self, overwrite: bool) -> Self {
        self.overwrite_rarity_names = overwrite;
        self
    }

    #[must_use]
    pub fn with_degrade_policy(mut self, policy: DegradePolicy) -> Self {
        self.on_degraded = policy;
        self
    }

    /// Assemble a trinket from its name, class token, rarity tier and tuned
    /// stats.
    ///
    /// # Errors
    /// See [`Self::assemble_properties`].
    pub fn assemble(
        &self,
        name: &str,
        class: &str,
        rarity: &str,
        tuned: &TunedStatSet,
    ) -> Result<AssemblyReport> {
        let properties = TrinketProperties {
            name: name.to_string(),
            class: class.to_string(),
            rarity: rarity.to_string(),
            stats: tuned.clone(),
            degradations: Vec::new(),
        };
        self.assemble_properties(&properties, &|_| {})
    }

    /// Assemble a trinket, reporting each step.
    ///
    /// # Errors
    /// - [`Error::Degraded`] when the policy is `abort` and a value had to be
    ///   replaced; compile-time degradations stop the run before any write
    /// - [`Error::UnpricedRarity`] when the tier has no price, before any
    ///   write
    /// - I/O errors from any store write
    pub fn assemble_properties(
        &self,
        properties: &TrinketProperties,
        progress: SynthesisProgressCallback,
    ) -> Result<AssemblyReport> {
        let name = properties.name.as_str();
        let slug = slugify(name);
        let mut degradations = properties.degradations.clone();
        tracing::info!("Assembling trinket '{}' ({})", name, slug);

        progress(&SynthesisProgress::with_detail(
            SynthesisPhase::CompilingBuffs,
            1,
            STEPS,
            name,
        ));
        let compilation = StatCompiler::new(self.catalog).compile(&properties.stats, name);
        degradations.extend(compilation.degradations.iter().cloned());
        self.on_degraded.check(&degradations)?;
        let rarity = self
            .catalog
            .rarity(&properties.rarity)
            .cloned()
            .ok_or_else(|| Error::UnpricedRarity(properties.rarity.clone()))?;

        progress(&SynthesisProgress::new(SynthesisPhase::WritingBuffs, 2, STEPS));
        let report = append_records(&compilation.buffs, &self.output.buffs, BUFF_CATEGORY)?;
        self.note(&mut degradations, report.recovered)?;

        progress(&SynthesisProgress::with_detail(
            SynthesisPhase::UpdatingRarities,
            3,
            STEPS,
            &properties.rarity,
        ));
        let upsert = RarityStore::new(&self.output.rarities).upsert(&rarity, self.catalog)?;
        self.note(&mut degradations, upsert.recovered)?;

        let strings = LocalizationStore::new(&self.output.strings)
            .with_overwrite_rarity_names(self.overwrite_rarity_names);
        let mut frame = None;
        if upsert.created {
            frame = self.install_frame(&rarity.id)?;
            let result = strings.upsert(
                &rarity_string_id(&rarity.id),
                &display_name(&rarity.id),
                EntryKind::RarityName,
            )?;
            self.note(&mut degradations, result.recovered)?;
        }

        progress(&SynthesisProgress::new(SynthesisPhase::WritingStrings, 4, STEPS));
        let result = strings.upsert(&title_string_id(&slug), name, EntryKind::TrinketTitle)?;
        self.note(&mut degradations, result.recovered)?;

        progress(&SynthesisProgress::new(SynthesisPhase::WritingEntry, 5, STEPS));
        let entry = TrinketEntry {
            id: slug,
            buffs: compilation.buff_ids(),
            hero_class_requirements: ClassRestriction::from_token(&properties.class).requirements(),
            rarity: rarity.id.clone(),
            price: rarity.price,
            limit: 1,
            origin_dungeon: String::new(),
        };
        let report = append_records(
            std::slice::from_ref(&entry),
            &self.output.entries,
            ENTRY_CATEGORY,
        )?;
        self.note(&mut degradations, report.recovered)?;

        progress(&SynthesisProgress::new(SynthesisPhase::Complete, STEPS, STEPS));
        tracing::info!(
            "Assembled '{}': {} buffs, rarity {}{}",
            name,
            entry.buffs.len(),
            entry.rarity,
            if upsert.created { " (new)" } else { "" }
        );

        Ok(AssemblyReport {
            name: name.to_string(),
            entry,
            buffs: compilation.buffs,
            rarity_created: upsert.created,
            frame,
            degradations,
        })
    }

    /// Record a store recovery and re-check the policy.
    fn note(&self, degradations: &mut Vec<Degradation>, recovered: Option<Degradation>) -> Result<()> {
        if let Some(degradation) = recovered {
            degradations.push(degradation);
            self.on_degraded.check(degradations)?;
        }
        Ok(())
    }

    fn install_frame(&self, rarity_id: &str) -> Result<Option<PathBuf>> {
        if rarity_id != FRAMED_RARITY {
            return Ok(None);
        }
        match self.rarity_frame {
            Some(frame) => install_rarity_frame(rarity_id, frame, &self.output.image_dir),
            None => {
                tracing::warn!("No rarity frame configured; '{}' has no frame", rarity_id);
                Ok(None)
            }
        }
    }
}
