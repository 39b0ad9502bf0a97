//! CLI command for model-driven trinket generation

use std::path::Path;
use std::time::Instant;

use crate::assembler::SynthesisProgress;
use crate::cli::progress::{
    LOOKING_GLASS, print_done, print_status, synthesis_spinner, update_spinner,
};
use crate::config::ForgeConfig;
use crate::forge::Forge;
use crate::generator::OllamaGenerator;

use super::assemble::print_report;

/// Generate `count` trinkets through the configured Ollama server.
pub fn execute(
    config: &Path,
    count: usize,
    max_attempts: Option<u32>,
    quiet: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();

    if !quiet {
        print_status(LOOKING_GLASS, "Loading catalog...");
    }
    let mut forge_config = ForgeConfig::load(config)?;
    if let Some(max) = max_attempts {
        forge_config.retry.max_attempts = max;
    }
    let forge = Forge::from_config(forge_config)?;
    let mut generator = OllamaGenerator::new(forge.config().generator.clone())?;

    for i in 1..=count {
        let pb = (!quiet).then(synthesis_spinner);
        let progress = |p: &SynthesisProgress| {
            if let Some(pb) = &pb {
                update_spinner(pb, p);
            }
        };

        let result = forge.generate_one(&mut generator, &progress);
        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }
        let report = result?;

        if !quiet {
            print_report(i, count, &report);
        }
    }

    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}
