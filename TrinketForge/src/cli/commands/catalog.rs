//! CLI command for listing the catalog

use std::path::Path;

use console::style;

use crate::catalog::MagnitudeUnit;
use crate::forge::Forge;

/// List stats, hero classes and rarity tiers.
pub fn list(config: &Path) -> anyhow::Result<()> {
    let forge = Forge::open(config)?;
    let catalog = forge.catalog();

    println!("{}", style("Stats").bold());
    for stat in catalog.stats() {
        let unit = match stat.unit {
            MagnitudeUnit::Percent => "%",
            MagnitudeUnit::Absolute => "",
        };
        let bound = |b: Option<f64>| b.map_or_else(|| "?".to_string(), |v| format!("{v}{unit}"));
        println!(
            "  {:<28} {:>8} .. {:<8} {}/{}",
            stat.name,
            bound(stat.min),
            bound(stat.max),
            stat.stat_type.as_deref().unwrap_or("-"),
            stat.stat_subtype.as_deref().unwrap_or("-"),
        );
    }

    println!("\n{}", style("Classes").bold());
    for class in catalog.hero_classes() {
        println!("  {class}");
    }

    println!("\n{}", style("Rarities").bold());
    for (tier, spec) in catalog.rarities() {
        let origin = if catalog.is_vanilla_rarity(&spec.id) {
            "base game"
        } else {
            "mod"
        };
        println!("  {tier:<16} {:>6} gold  ({origin})", spec.price);
    }

    Ok(())
}
