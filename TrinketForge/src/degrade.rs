//! Degraded (non-fatal) outcomes
//!
//! Formatting glitches in generator output or shared files never abort a run
//! on their own. Each one is recorded as a [`Degradation`] with the safe
//! default that replaced it, and a [`DegradePolicy`] decides afterwards
//! whether the run continues.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Why a value was replaced with a safe default.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradationReason {
    /// The tuning answer could not be used; the sign-only stats were kept.
    TuningFallback(String),
    /// The stat is not in the catalog; engine fields were left null.
    UnknownStat,
    /// The value carried only a sign; amount set to 0.
    MissingMagnitude(String),
    /// The value did not parse as a number; amount set to 0.
    UnparseableAmount(String),
    /// A shared store could not be parsed and was started over.
    CorruptStore {
        /// The store file.
        path: PathBuf,
        /// Parser message.
        detail: String,
    },
}

/// One degraded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    /// The stat, field or file affected.
    pub subject: String,
    /// What happened.
    pub reason: DegradationReason,
}

impl Degradation {
    #[must_use]
    pub fn new(subject: impl Into<String>, reason: DegradationReason) -> Self {
        Self {
            subject: subject.into(),
            reason,
        }
    }

    /// Log this degradation as a warning.
    pub fn log(&self) {
        tracing::warn!("Degraded: {}", self);
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            DegradationReason::TuningFallback(detail) => {
                write!(f, "{}: tuning unusable ({detail}), kept sign-only stats", self.subject)
            }
            DegradationReason::UnknownStat => {
                write!(f, "{}: not in stat catalog, engine fields left null", self.subject)
            }
            DegradationReason::MissingMagnitude(value) => {
                write!(f, "{}: value '{value}' has no magnitude, amount set to 0", self.subject)
            }
            DegradationReason::UnparseableAmount(value) => {
                write!(f, "{}: value '{value}' is not a number, amount set to 0", self.subject)
            }
            DegradationReason::CorruptStore { path, detail } => write!(
                f,
                "{}: {} could not be parsed ({detail}), started over",
                self.subject,
                path.display()
            ),
        }
    }
}

/// What to do once a run has produced degraded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradePolicy {
    /// Log and keep going.
    #[default]
    Continue,
    /// Stop before anything else is written.
    Abort,
}

impl DegradePolicy {
    /// Check collected degradations against the policy.
    ///
    /// # Errors
    /// Returns [`Error::Degraded`] under [`DegradePolicy::Abort`] when
    /// `degradations` is non-empty.
    pub fn check(self, degradations: &[Degradation]) -> Result<()> {
        match (self, degradations.first()) {
            (Self::Abort, Some(first)) => Err(Error::Degraded {
                count: degradations.len(),
                first: first.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
