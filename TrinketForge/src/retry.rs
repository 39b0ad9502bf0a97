//! Generate-validate-retry loop
//!
//! Asks the generator for an answer, validates it locally and asks again on
//! rejection. Unbounded unless the [`RetryPolicy`] sets `max_attempts`.
//! Generator errors are not retried.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validate::Rejection;

/// Delay between rejected attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Same delay every time.
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay after the given (1-based) failed attempt.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => {
                let factor = 1u32
                    .checked_shl(attempt.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Backoff kind as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    None,
    Fixed,
    Exponential,
}

/// How long to keep asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Retry until a valid answer arrives.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Give up after `max_attempts` answers. Zero means unbounded.
    #[must_use]
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: (max_attempts > 0).then_some(max_attempts),
            backoff: Backoff::None,
        }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Request answers until one validates.
///
/// `label` names the property being generated in log lines. Each rejection
/// is logged with its reason and the offending text.
///
/// # Errors
/// Propagates the first error from `request` unchanged. Returns
/// [`Error::RetryExhausted`] once a bounded policy runs out of attempts.
pub fn run_until_valid<T, R, V>(
    policy: &RetryPolicy,
    label: &str,
    mut request: R,
    mut validate: V,
) -> Result<T>
where
    R: FnMut() -> Result<String>,
    V: FnMut(&str) -> std::result::Result<T, Rejection>,
{
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        let answer = request()?;
        tracing::debug!("{} answer #{}: {:?}", label, attempts, answer);

        match validate(&answer) {
            Ok(value) => {
                if attempts > 1 {
                    tracing::info!("{} accepted after {} attempts", label, attempts);
                }
                return Ok(value);
            }
            Err(rejection) => {
                tracing::warn!(
                    "{} rejected ({}): {:?}",
                    label,
                    rejection,
                    answer.trim()
                );
                if policy.exhausted(attempts) {
                    return Err(Error::RetryExhausted {
                        attempts,
                        last_rejection: rejection,
                    });
                }
                let delay = policy.backoff.delay(attempts);
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
    }
}
