//! CLI commands for offline assembly and compilation

use std::path::Path;

use anyhow::bail;

use crate::assembler::{AssemblyReport, TrinketProperties};
use crate::cli::progress::{DISK, GEAR, WARNING, print_step};
use crate::compiler::StatCompiler;
use crate::forge::Forge;
use crate::validate::{parse_authored_stats, validate_single_token};

/// Write a trinket from hand-picked properties.
pub fn assemble(
    config: &Path,
    name: &str,
    class: &str,
    rarity: &str,
    stats: &str,
) -> anyhow::Result<()> {
    let forge = Forge::open(config)?;
    let catalog = forge.catalog();

    let Ok(class) = validate_single_token(class, &catalog.class_tokens()) else {
        bail!(
            "Unknown class '{class}'. Expected every_class or one of: {}",
            join(catalog.hero_classes().iter())
        );
    };
    let Ok(rarity) = validate_single_token(rarity, &catalog.rarity_tiers()) else {
        bail!(
            "Unknown rarity '{rarity}'. Expected one of: {}",
            join(catalog.rarities().keys())
        );
    };

    let (stats, degradation) = parse_authored_stats(stats).into_parts();
    if stats.is_empty() {
        bail!("No stats given");
    }

    let properties = TrinketProperties {
        name: name.trim().to_string(),
        class,
        rarity,
        stats,
        degradations: degradation.into_iter().collect(),
    };
    let report = forge.assembler().assemble_properties(&properties, &|_| {})?;
    print_report(1, 1, &report);
    Ok(())
}

/// Print compiled buffs as JSON without touching any file.
pub fn compile(config: &Path, name: &str, stats: &str) -> anyhow::Result<()> {
    let forge = Forge::open(config)?;
    let (stats, degradation) = parse_authored_stats(stats).into_parts();

    let compilation = StatCompiler::new(forge.catalog()).compile(&stats, name.trim());
    for d in degradation.iter().chain(&compilation.degradations) {
        eprintln!("{WARNING}{d}");
    }
    println!("{}", serde_json::to_string_pretty(&compilation.buffs)?);
    Ok(())
}

/// Summarize one assembled trinket.
pub fn print_report(current: usize, total: usize, report: &AssemblyReport) {
    let entry = &report.entry;
    let classes = if entry.hero_class_requirements.is_empty() {
        "every class".to_string()
    } else {
        entry.hero_class_requirements.join(", ")
    };
    print_step(
        current,
        total,
        DISK,
        &format!(
            "{} ({}, {}, {} gold)",
            report.name, classes, entry.rarity, entry.price
        ),
    );
    for buff in &report.buffs {
        println!(
            "      {GEAR}{} {}/{} {}",
            buff.id,
            buff.stat_type.as_deref().unwrap_or("-"),
            buff.stat_sub_type.as_deref().unwrap_or("-"),
            buff.amount
        );
    }
    if report.rarity_created {
        println!("      new rarity '{}'", entry.rarity);
    }
    if let Some(frame) = &report.frame {
        println!("      frame {}", frame.display());
    }
    for d in &report.degradations {
        println!("      {WARNING}{d}");
    }
}

fn join<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(", ")
}
