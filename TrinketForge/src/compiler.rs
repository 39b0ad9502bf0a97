//! Stat compilation
//!
//! Turns a [`TunedStatSet`] into the engine's buff records. Lookup driven:
//! each stat's engine fields and unit come from the catalog, with two special
//! cases the engine needs:
//! - `Damage` is a range stat and becomes two adjacent records
//!   (`damage_low`, `damage_high`) with the same amount
//! - `Death Blow` resistance is stored with the opposite sign
//!
//! Compilation never fails. Values that cannot be used compile to `0` and are
//! reported as [`Degradation`]s.

use serde::{Deserialize, Serialize};

use crate::catalog::{MagnitudeUnit, SchemaCatalog};
use crate::degrade::{Degradation, DegradationReason};
use crate::utils::slugify;
use crate::validate::TunedStatSet;

/// Range stat split into low/high records.
pub const DAMAGE_STAT: &str = "Damage";
/// Stat whose amount is negated.
pub const DEATH_BLOW_STAT: &str = "Death Blow";

const DAMAGE_LOW: &str = "damage_low";
const DAMAGE_HIGH: &str = "damage_high";

/// Condition data attached to every buff. Trinket buffs always apply, so
/// this is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleData {
    pub float: serde_json::Number,
    pub string: String,
}

impl Default for RuleData {
    fn default() -> Self {
        Self {
            float: serde_json::Number::from(0),
            string: String::new(),
        }
    }
}

/// One engine buff, as stored in the buffs file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffRecord {
    pub id: String,
    pub stat_type: Option<String>,
    pub stat_sub_type: Option<String>,
    pub amount: f64,
    pub remove_if_not_active: bool,
    pub rule_type: String,
    pub is_false_rule: bool,
    pub rule_data: RuleData,
}

impl BuffRecord {
    fn always(id: String, stat_type: Option<String>, stat_sub_type: Option<String>, amount: f64) -> Self {
        Self {
            id,
            stat_type,
            stat_sub_type,
            amount,
            remove_if_not_active: false,
            rule_type: "always".to_string(),
            is_false_rule: false,
            rule_data: RuleData::default(),
        }
    }
}

/// Buff id for the `index`-th (1-based) buff of a trinket.
#[must_use]
pub fn buff_id(trinket_name: &str, index: usize) -> String {
    format!("TRINKET_{}_BUFF{index}", slugify(trinket_name))
}

/// Compiled buffs plus whatever had to be replaced along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compilation {
    pub buffs: Vec<BuffRecord>,
    pub degradations: Vec<Degradation>,
}

impl Compilation {
    /// Buff ids in record order.
    #[must_use]
    pub fn buff_ids(&self) -> Vec<String> {
        self.buffs.iter().map(|b| b.id.clone()).collect()
    }
}

/// Compiles tuned stats against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct StatCompiler<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> StatCompiler<'a> {
    #[must_use]
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Compile `tuned` into buff records for `trinket_name`.
    ///
    /// Records follow the stats' order. Ids use one running 1-based index, so
    /// the record after a `Damage` pair continues from the high half.
    #[must_use]
    pub fn compile(&self, tuned: &TunedStatSet, trinket_name: &str) -> Compilation {
        let mut out = Compilation::default();
        let mut index = 0;

        for (stat, value) in tuned.iter() {
            let definition = self.catalog.stat(stat);
            if definition.is_none() {
                out.degradations
                    .push(Degradation::new(stat, DegradationReason::UnknownStat));
            }

            let (mut amount, issue) = parse_amount(value);
            if let Some(reason) = issue {
                out.degradations.push(Degradation::new(stat, reason));
            }
            if definition.is_some_and(|d| d.unit == MagnitudeUnit::Percent) {
                amount /= 100.0;
            }
            if stat == DEATH_BLOW_STAT {
                amount = -amount;
            }

            let stat_type = definition.and_then(|d| d.stat_type.clone());
            index += 1;
            if stat == DAMAGE_STAT {
                out.buffs.push(BuffRecord::always(
                    buff_id(trinket_name, index),
                    stat_type.clone(),
                    Some(DAMAGE_LOW.to_string()),
                    amount,
                ));
                index += 1;
                out.buffs.push(BuffRecord::always(
                    buff_id(trinket_name, index),
                    stat_type,
                    Some(DAMAGE_HIGH.to_string()),
                    amount,
                ));
            } else {
                out.buffs.push(BuffRecord::always(
                    buff_id(trinket_name, index),
                    stat_type,
                    definition.and_then(|d| d.stat_subtype.clone()),
                    amount,
                ));
            }
        }

        for degradation in &out.degradations {
            degradation.log();
        }
        tracing::debug!(
            "Compiled {} stats into {} buffs for '{}'",
            tuned.len(),
            out.buffs.len(),
            trinket_name
        );
        out
    }
}

/// Split off the leading sign, parse the magnitude and reapply the sign.
fn parse_amount(value: &str) -> (f64, Option<DegradationReason>) {
    let value = value.trim();
    let (negative, magnitude) = match value.chars().next() {
        Some('-') => (true, &value[1..]),
        Some('+') => (false, &value[1..]),
        _ => (false, value),
    };
    let magnitude = magnitude.trim();
    if magnitude.is_empty() {
        return (0.0, Some(DegradationReason::MissingMagnitude(value.to_string())));
    }
    match magnitude.parse::<f64>() {
        Ok(m) if m.is_finite() => (if negative { -m } else { m }, None),
        _ => (0.0, Some(DegradationReason::UnparseableAmount(value.to_string()))),
    }
}
