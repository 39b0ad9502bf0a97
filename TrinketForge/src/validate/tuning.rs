//! Best-effort parsing of stat tuning answers

use indexmap::IndexMap;

use crate::degrade::{Degradation, DegradationReason};
use crate::utils::{Literal, parse_literal};

use super::strip_code_fence;
use super::stats::{CandidateStatSet, Sign};

/// Tuned stats: stat name to signed numeric text (`"-10"`, `"+30"`), in
/// listing order. Values are kept as text; the compiler parses them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TunedStatSet {
    stats: IndexMap<String, String>,
}

impl TunedStatSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a stat's value, keeping its original position when it repeats.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.stats.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.stats.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TunedStatSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            stats: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<&CandidateStatSet> for TunedStatSet {
    /// Sign-only values (`"+"`/`"-"`), the tuning fallback.
    fn from(candidate: &CandidateStatSet) -> Self {
        candidate
            .iter()
            .map(|(name, sign)| (name, sign.to_string()))
            .collect()
    }
}

/// Result of parsing a tuning answer. Never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TuningOutcome {
    /// The answer was a usable mapping.
    Tuned(TunedStatSet),
    /// The answer was unusable; the candidate's bare signs stand in.
    Degraded {
        stats: TunedStatSet,
        degradation: Degradation,
    },
}

impl TuningOutcome {
    /// The stats to compile, tuned or not.
    #[must_use]
    pub fn stats(&self) -> &TunedStatSet {
        match self {
            Self::Tuned(stats) | Self::Degraded { stats, .. } => stats,
        }
    }

    #[must_use]
    pub fn into_parts(self) -> (TunedStatSet, Option<Degradation>) {
        match self {
            Self::Tuned(stats) => (stats, None),
            Self::Degraded { stats, degradation } => (stats, Some(degradation)),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Parse a tuning answer as a stat-to-value mapping.
///
/// Accepts a JSON object or a dict literal. Values must be integers or
/// numeric strings. Anything else falls back to `candidate` with a
/// [`DegradationReason::TuningFallback`]. Stats that were not chosen are kept
/// but logged.
#[must_use]
pub fn parse_tuned_stats(raw: &str, candidate: &CandidateStatSet) -> TuningOutcome {
    match parse_mapping(strip_code_fence(raw)) {
        Ok(stats) => {
            for (name, _) in stats.iter() {
                if !candidate.contains(name) {
                    tracing::warn!("Tuner returned '{}' which was not chosen", name);
                }
            }
            TuningOutcome::Tuned(stats)
        }
        Err(reason) => {
            let degradation =
                Degradation::new("stat tuning", DegradationReason::TuningFallback(reason));
            degradation.log();
            TuningOutcome::Degraded {
                stats: TunedStatSet::from(candidate),
                degradation,
            }
        }
    }
}

/// Parse a hand-written stat mapping such as `{'Damage': '+15'}`.
///
/// Goes through the same best-effort path as a tuning answer. The fallback
/// keeps each key with the leading sign of its value (`+` when there is
/// none), so `{'Stress': '-'}` compiles like an untuned `-Stress`.
#[must_use]
pub fn parse_authored_stats(raw: &str) -> TuningOutcome {
    let candidate = match parse_literal(strip_code_fence(raw)) {
        Ok(Literal::Dict(pairs)) => pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let Literal::Str(name) = key else {
                    return None;
                };
                let sign = match value {
                    Literal::Str(s) => s.trim().chars().next().and_then(Sign::from_char),
                    Literal::Int(i) if i < 0 => Some(Sign::Minus),
                    Literal::Float(x) if x < 0.0 => Some(Sign::Minus),
                    _ => None,
                };
                Some((name, sign.unwrap_or(Sign::Plus)))
            })
            .collect(),
        _ => CandidateStatSet::default(),
    };
    parse_tuned_stats(raw, &candidate)
}

fn parse_mapping(text: &str) -> Result<TunedStatSet, String> {
    let literal = parse_literal(text).map_err(|e| e.to_string())?;
    let Literal::Dict(pairs) = literal else {
        return Err(format!("expected a mapping, got a {}", literal.kind()));
    };
    if pairs.is_empty() {
        return Err("empty mapping".to_string());
    }

    let mut stats = TunedStatSet::new();
    for (key, value) in pairs {
        let Literal::Str(name) = key else {
            return Err(format!("key {key} is not a string"));
        };
        let value = match value {
            Literal::Int(i) => i.to_string(),
            Literal::Str(s) if is_numeric(&s) => s.trim().to_string(),
            other => return Err(format!("value {other} for '{name}' is not a number")),
        };
        stats.insert(name, value);
    }
    Ok(stats)
}

/// Optional sign followed by a finite float.
fn is_numeric(text: &str) -> bool {
    let text = text.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    !unsigned.is_empty() && unsigned.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Sign;

    fn candidate() -> CandidateStatSet {
        [
            ("Bleed Resist".to_string(), Sign::Minus),
            ("Stress".to_string(), Sign::Minus),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_dict_literal() {
        let outcome = parse_tuned_stats("{'Bleed Resist': '-10', 'Stress': -20}", &candidate());
        assert!(!outcome.is_degraded());
        let stats = outcome.stats();
        assert_eq!(stats.get("Bleed Resist"), Some("-10"));
        assert_eq!(stats.get("Stress"), Some("-20"));
    }

    #[test]
    fn test_json_object() {
        let outcome = parse_tuned_stats("{\"Stress\": \"+5\"}", &candidate());
        assert_eq!(outcome.stats().get("Stress"), Some("+5"));
    }

    #[test]
    fn test_extra_stat_kept() {
        let outcome = parse_tuned_stats("{'HP': '+3'}", &candidate());
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.stats().get("HP"), Some("+3"));
    }

    #[test]
    fn test_fallback_on_prose() {
        let outcome = parse_tuned_stats("Sure! Bleed Resist should be -10.", &candidate());
        let (stats, degradation) = outcome.into_parts();
        assert_eq!(
            stats.iter().collect::<Vec<_>>(),
            vec![("Bleed Resist", "-"), ("Stress", "-")]
        );
        assert!(matches!(
            degradation.map(|d| d.reason),
            Some(DegradationReason::TuningFallback(_))
        ));
    }

    #[test]
    fn test_fallback_on_bad_values() {
        assert!(parse_tuned_stats("{'Stress': 1.5}", &candidate()).is_degraded());
        assert!(parse_tuned_stats("{'Stress': 'lots'}", &candidate()).is_degraded());
        assert!(parse_tuned_stats("['Stress']", &candidate()).is_degraded());
        assert!(parse_tuned_stats("{}", &candidate()).is_degraded());
        assert!(parse_tuned_stats("{'Stress': '-'}", &candidate()).is_degraded());
        assert!(parse_tuned_stats("{'Stress': 'nan', }", &candidate()).is_degraded());
        assert!(parse_tuned_stats("{'Stress': '1e999'}", &candidate()).is_degraded());
    }

    #[test]
    fn test_authored_stats() {
        let outcome = parse_authored_stats("{'Bleed Resist': '-5', 'Damage': '+15'}");
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.stats().get("Damage"), Some("+15"));

        let (stats, degradation) = parse_authored_stats("{'Stress': '-', 'HP': 'lots'}").into_parts();
        assert!(degradation.is_some());
        assert_eq!(
            stats.iter().collect::<Vec<_>>(),
            vec![("Stress", "-"), ("HP", "+")]
        );
    }

    #[test]
    fn test_numeric_strings() {
        assert!(is_numeric("-10"));
        assert!(is_numeric(" +2.5 "));
        assert!(!is_numeric("+"));
        assert!(!is_numeric("ten"));
        assert!(!is_numeric("nan"));
        assert!(!is_numeric("+inf"));
        assert!(!is_numeric("1e999"));
    }
}
