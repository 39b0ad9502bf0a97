//! Stat list validation

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::utils::{Literal, parse_literal};

use super::{Rejection, strip_code_fence};

/// Trinkets with more stats than this are accepted but logged.
pub const MAX_STATS: usize = 5;

/// Direction of a candidate stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// Parse a leading `+` or `-`.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Validated stat choice: stat name to sign, in the order the generator
/// listed them. Every key is a known stat.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateStatSet {
    stats: IndexMap<String, Sign>,
}

impl CandidateStatSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Sign> {
        self.stats.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.stats.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Sign)> {
        self.stats.iter().map(|(name, sign)| (name.as_str(), *sign))
    }

    /// Dict literal handed to the tuner, e.g. `{'Stress': '-', 'HP': '+'}`.
    #[must_use]
    pub fn to_prompt_literal(&self) -> String {
        let pairs = self
            .iter()
            .map(|(name, sign)| (Literal::Str(name.to_string()), Literal::Str(sign.to_string())))
            .collect();
        Literal::Dict(pairs).to_string()
    }
}

impl FromIterator<(String, Sign)> for CandidateStatSet {
    fn from_iter<I: IntoIterator<Item = (String, Sign)>>(iter: I) -> Self {
        Self {
            stats: iter.into_iter().collect(),
        }
    }
}

/// Validate a stat list answer against the known stat names.
///
/// Two shapes are accepted: a bracketed list of `, `-separated items that are
/// single-quoted or bare (`['+Accuracy', '-Stress']`), or any list literal
/// the lenient parser understands (double quotes, odd spacing, a trailing
/// comma), which is re-serialized into the first shape and checked again.
///
/// Every item must be a `+`/`-` followed by a known stat name. All offending
/// names are reported together. More than [`MAX_STATS`] stats is accepted
/// with a warning; a repeated stat keeps its first position and last sign.
///
/// # Errors
/// [`Rejection::MalformedList`] when neither shape applies,
/// [`Rejection::UnknownStats`] for unsigned or unknown items and
/// [`Rejection::EmptyList`] when the list holds nothing.
pub fn validate_stat_list(
    raw: &str,
    allowed_names: &IndexSet<String>,
) -> Result<CandidateStatSet, Rejection> {
    let text = strip_code_fence(raw);
    let items = match split_plain_list(text) {
        Some(items) => items,
        None => {
            let normalized = normalize_list_literal(text)?;
            split_plain_list(&normalized).ok_or_else(|| Rejection::MalformedList {
                detail: format!("could not split '{normalized}'"),
            })?
        }
    };

    if items.is_empty() {
        return Err(Rejection::EmptyList);
    }

    let mut stats = IndexMap::new();
    let mut offenders = Vec::new();
    for item in &items {
        let mut chars = item.chars();
        let sign = chars.next().and_then(Sign::from_char);
        let name = chars.as_str().trim();
        match sign {
            Some(sign) if allowed_names.contains(name) => {
                stats.insert(name.to_string(), sign);
            }
            Some(_) => offenders.push(name.to_string()),
            None => offenders.push(item.clone()),
        }
    }

    if !offenders.is_empty() {
        return Err(Rejection::UnknownStats(offenders));
    }
    if stats.len() > MAX_STATS {
        tracing::warn!(
            "Stat list has {} stats, more than the usual {}",
            stats.len(),
            MAX_STATS
        );
    }
    Ok(CandidateStatSet { stats })
}

/// Split the plain shape: `[` items joined by `, ` `]`, each item either
/// wrapped in single quotes or bare. Returns `None` for anything else.
fn split_plain_list(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner
        .split(", ")
        .map(|item| {
            let item = item.trim();
            let bare = item
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(item);
            if bare.is_empty() || bare.contains(['\'', '"', '[', ']']) {
                None
            } else {
                Some(bare.to_string())
            }
        })
        .collect()
}

/// Parse a list literal and render it in the plain shape.
fn normalize_list_literal(text: &str) -> Result<String, Rejection> {
    let literal = parse_literal(text).map_err(|e| Rejection::MalformedList {
        detail: e.to_string(),
    })?;
    let Literal::List(items) = &literal else {
        return Err(Rejection::MalformedList {
            detail: format!("expected a list, got a {}", literal.kind()),
        });
    };
    if let Some(other) = items.iter().find(|i| !matches!(i, Literal::Str(_))) {
        return Err(Rejection::MalformedList {
            detail: format!("list item {other} is a {}, not a string", other.kind()),
        });
    }
    Ok(literal.to_string())
}
