//! # TrinketForge
//!
//! Generates new trinkets for Darkest Dungeon mods with a chat model and
//! merges them into the mod's shared game data.
//!
//! ## Pipeline
//!
//! - **Catalog** - stats, hero classes and rarity tiers the generator may use
//! - **Synthesis** - name, class, rarity and stats, each answer validated and
//!   retried until usable
//! - **Compilation** - tuned stats become engine buff records
//! - **Assembly** - buffs, rarities, localized strings and the trinket entry
//!   are written to the mod's files, in dependency order
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use trinketforge::prelude::*;
//!
//! let forge = Forge::open(Path::new("forge.toml"))?;
//! let tuned: TunedStatSet = [("Bleed Resist", "-5"), ("Damage", "+15")]
//!     .into_iter()
//!     .collect();
//! let report = forge
//!     .assembler()
//!     .assemble("Starweave Pendant", "every_class", "very_rare", &tuned)?;
//! println!("{} buffs written", report.buffs.len());
//! # Ok::<(), trinketforge::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `ollama` - [`generator::OllamaGenerator`], a blocking client for a local
//!   Ollama server
//! - `cli` - Enables the `trinketforge` command-line binary (implies `ollama`)

pub mod assembler;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod degrade;
pub mod error;
pub mod forge;
pub mod generator;
pub mod prompts;
pub mod retry;
pub mod store;
pub mod synth;
pub mod utils;
pub mod validate;

// Re-exports for convenience
pub use error::{Error, Result};
pub use forge::Forge;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::forge::Forge;

    pub use crate::assembler::{
        AssemblyReport, SynthesisPhase, SynthesisProgress, TrinketEntry, TrinketProperties,
        TrinketRecordAssembler,
    };
    pub use crate::catalog::{ClassRestriction, RaritySpec, SchemaCatalog, StatDefinition};
    pub use crate::compiler::{BuffRecord, StatCompiler};
    pub use crate::config::ForgeConfig;
    pub use crate::degrade::{Degradation, DegradePolicy};
    pub use crate::generator::{GenerationRequest, Generator, GeneratorRole};
    pub use crate::retry::RetryPolicy;
    pub use crate::synth::TrinketSynthesizer;
    pub use crate::validate::{CandidateStatSet, Rejection, TunedStatSet, TuningOutcome};

    #[cfg(feature = "ollama")]
    pub use crate::generator::OllamaGenerator;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
