//! Generator answer validation
//!
//! Raw generator text goes through a strict parse-then-validate boundary:
//! every function here either returns a typed value or a [`Rejection`]
//! explaining why the answer is unusable. Rejections are not errors; the
//! retry loop logs them and asks again.

mod stats;
mod tuning;

use indexmap::IndexSet;
use thiserror::Error;

pub use stats::{CandidateStatSet, MAX_STATS, Sign, validate_stat_list};
pub use tuning::{TunedStatSet, TuningOutcome, parse_authored_stats, parse_tuned_stats};

/// Why a generator answer was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// A single-token answer outside the allowed set.
    #[error("'{answer}' is not an allowed value")]
    NotAllowed {
        /// The answer after normalization.
        answer: String,
    },

    /// The answer is not a bracketed list in either accepted shape.
    #[error("not a list: {detail}")]
    MalformedList {
        /// What the parser tripped over.
        detail: String,
    },

    /// List items that are not signed, known stat names.
    #[error("unknown stats: {}", .0.join(", "))]
    UnknownStats(Vec<String>),

    /// The list parsed but holds no stats.
    #[error("empty stat list")]
    EmptyList,
}

/// Validate a single-token answer (class, rarity).
///
/// Double quotes, surrounding single quotes and whitespace are stripped and
/// the token is lowercased before the membership check.
///
/// # Errors
/// Returns [`Rejection::NotAllowed`] when the token is not in `allowed`.
pub fn validate_single_token(raw: &str, allowed: &IndexSet<String>) -> Result<String, Rejection> {
    let token = raw
        .replace('"', "")
        .trim()
        .trim_matches('\'')
        .trim()
        .to_lowercase();
    if allowed.contains(&token) {
        Ok(token)
    } else {
        Err(Rejection::NotAllowed { answer: token })
    }
}

/// Clean a name answer. Names are free-form and never rejected.
#[must_use]
pub fn clean_name(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

/// Strip a surrounding Markdown code fence (```` ```python ... ``` ````).
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = body.strip_suffix("```") else {
        return trimmed;
    };
    // drop the language tag line, if any
    match body.split_once('\n') {
        Some((tag, rest)) if !tag.contains(['[', '{']) => rest.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(values: &[&str]) -> IndexSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_single_token_normalization() {
        let classes = allowed(&["jester", "vestal", "every_class"]);
        assert_eq!(validate_single_token("  'Jester'\n", &classes).unwrap(), "jester");
        assert_eq!(validate_single_token("\"VESTAL\"", &classes).unwrap(), "vestal");
        assert_eq!(
            validate_single_token("every_class", &classes).unwrap(),
            "every_class"
        );
    }

    #[test]
    fn test_single_token_rejected() {
        let tiers = allowed(&["common", "rare"]);
        let rejection = validate_single_token("The rarity is rare", &tiers).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::NotAllowed {
                answer: "the rarity is rare".to_string()
            }
        );
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name(" \"Starweave Pendant\"\n"), "Starweave Pendant");
        assert_eq!(clean_name("Moonwhisper's Tear"), "Moonwhisper's Tear");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```python\n['+HP']\n```"), "['+HP']");
        assert_eq!(strip_code_fence("```['+HP']```"), "['+HP']");
        assert_eq!(strip_code_fence("  ['+HP'] "), "['+HP']");
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::UnknownStats(vec!["Luck".to_string(), "Mana".to_string()]);
        assert_eq!(rejection.to_string(), "unknown stats: Luck, Mana");
    }
}
