//! Types for trinket synthesis and assembly

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compiler::BuffRecord;
use crate::degrade::Degradation;

/// Progress callback type for synthesis runs
pub type SynthesisProgressCallback<'a> = &'a (dyn Fn(&SynthesisProgress) + Sync + Send);

/// Progress information during a synthesis run
#[derive(Debug, Clone)]
pub struct SynthesisProgress {
    /// Current phase
    pub phase: SynthesisPhase,
    /// Current step (1-indexed)
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// Detail for the step, e.g. the trinket name
    pub detail: Option<String>,
}

impl SynthesisProgress {
    #[must_use]
    pub fn new(phase: SynthesisPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(
        phase: SynthesisPhase,
        current: usize,
        total: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            detail: Some(detail.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of a synthesis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisPhase {
    NamingTrinket,
    ChoosingClass,
    ChoosingRarity,
    ChoosingStats,
    TuningStats,
    CompilingBuffs,
    WritingBuffs,
    UpdatingRarities,
    WritingStrings,
    WritingEntry,
    Complete,
}

impl SynthesisPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NamingTrinket => "Naming trinket",
            Self::ChoosingClass => "Choosing class",
            Self::ChoosingRarity => "Choosing rarity",
            Self::ChoosingStats => "Choosing stats",
            Self::TuningStats => "Tuning stats",
            Self::CompilingBuffs => "Compiling buffs",
            Self::WritingBuffs => "Writing buffs",
            Self::UpdatingRarities => "Updating rarities",
            Self::WritingStrings => "Writing strings",
            Self::WritingEntry => "Writing entry",
            Self::Complete => "Complete",
        }
    }
}

/// A trinket as stored in the entries file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrinketEntry {
    /// Slug of the trinket name
    pub id: String,
    /// Buff ids in order
    pub buffs: Vec<String>,
    /// Empty when every class may equip it
    pub hero_class_requirements: Vec<String>,
    /// Rarity id
    pub rarity: String,
    pub price: u32,
    pub limit: u32,
    pub origin_dungeon: String,
}

/// Everything one assembly wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    /// Display name the trinket was assembled under
    pub name: String,
    pub entry: TrinketEntry,
    pub buffs: Vec<BuffRecord>,
    /// The rarity was new to the mod
    pub rarity_created: bool,
    /// Rarity frame written for a new framed rarity
    pub frame: Option<PathBuf>,
    /// Values replaced with safe defaults along the way
    pub degradations: Vec<Degradation>,
}

impl AssemblyReport {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}
