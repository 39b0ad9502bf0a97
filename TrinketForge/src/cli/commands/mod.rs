//! Subcommands

pub mod assemble;
pub mod catalog;
pub mod generate;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Generate trinkets with the configured model and write them to the mod
    Generate {
        /// Path to forge.toml
        #[arg(short, long, default_value = "forge.toml")]
        config: PathBuf,

        /// Number of trinkets to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Give up on a property after this many rejected answers (0 retries forever)
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write a trinket from given properties, without a model
    Assemble {
        /// Path to forge.toml
        #[arg(short, long, default_value = "forge.toml")]
        config: PathBuf,

        /// Trinket display name
        #[arg(long)]
        name: String,

        /// Hero class, or every_class
        #[arg(long, default_value = "every_class")]
        class: String,

        /// Rarity tier
        #[arg(long)]
        rarity: String,

        /// Stat mapping, e.g. "{'Damage': '+15', 'Stress': '-10'}"
        #[arg(long)]
        stats: String,
    },

    /// Print the buffs a stat mapping compiles to, without writing
    Compile {
        /// Path to forge.toml
        #[arg(short, long, default_value = "forge.toml")]
        config: PathBuf,

        /// Trinket display name (used for buff ids)
        #[arg(long)]
        name: String,

        /// Stat mapping, e.g. "{'Damage': '+15'}"
        #[arg(long)]
        stats: String,
    },

    /// List the stats, classes and rarities a trinket may use
    Catalog {
        /// Path to forge.toml
        #[arg(short, long, default_value = "forge.toml")]
        config: PathBuf,
    },
}

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Generate {
                config,
                count,
                max_attempts,
                quiet,
            } => generate::execute(config, *count, *max_attempts, *quiet),
            Commands::Assemble {
                config,
                name,
                class,
                rarity,
                stats,
            } => assemble::assemble(config, name, class, rarity, stats),
            Commands::Compile { config, name, stats } => assemble::compile(config, name, stats),
            Commands::Catalog { config } => catalog::list(config),
        }
    }
}
