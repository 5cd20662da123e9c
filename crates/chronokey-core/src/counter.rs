//! Time-step counter derivation (RFC 6238 §4).
//!
//! This is the only place where epoch seconds are turned into a counter.
//! Everything downstream consumes a [`Counter`] value.

use std::fmt;
use std::num::NonZeroU32;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::OtpError;

/// Default time step in seconds (RFC 6238 §5.2).
pub const DEFAULT_TIME_STEP: u32 = 30;

// ── TimeStep ────────────────────────────────────────────────────────

/// Seconds per counter tick. Always non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TimeStep(NonZeroU32);

impl TimeStep {
    /// The RFC 6238 recommended step of 30 seconds.
    pub const DEFAULT: Self = match NonZeroU32::new(DEFAULT_TIME_STEP) {
        Some(step) => Self(step),
        None => unreachable!(),
    };

    /// Build a time step from a number of seconds.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidConfig` if `seconds` is 0.
    pub fn new(seconds: u32) -> Result<Self, OtpError> {
        NonZeroU32::new(seconds)
            .map(Self)
            .ok_or_else(|| OtpError::InvalidConfig("time step must be > 0 seconds".to_owned()))
    }

    /// Step length in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0.get()
    }
}

impl Default for TimeStep {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for TimeStep {
    type Error = OtpError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::new(seconds)
    }
}

impl From<TimeStep> for u32 {
    fn from(step: TimeStep) -> Self {
        step.seconds()
    }
}

// ── Counter ─────────────────────────────────────────────────────────

/// Moving factor fed to HMAC.
///
/// Signed so that instants before 1970 still map to a monotonic value;
/// serialized as the 8-byte big-endian two's-complement word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counter(i64);

impl Counter {
    /// Wrap a raw counter value (e.g. one remembered at generation time).
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// 8-byte big-endian encoding (RFC 4226 §5.2).
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Counter shifted by `delta` steps, or `None` past the `i64` range.
    #[must_use]
    pub const fn checked_offset(self, delta: i64) -> Option<Self> {
        match self.0.checked_add(delta) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Derivation ──────────────────────────────────────────────────────

/// `T = floor(epoch_seconds / step)`.
///
/// Uses Euclidean division so a negative epoch rounds toward negative
/// infinity (`-1 / 30 == -1`, not `0`).
#[must_use]
pub fn counter_for(epoch_seconds: i64, step: TimeStep) -> Counter {
    Counter(epoch_seconds.div_euclid(i64::from(step.seconds())))
}

/// Seconds left before [`counter_for`] moves to the next value.
///
/// Always in `1..=step`.
#[must_use]
pub fn remaining_validity(epoch_seconds: i64, step: TimeStep) -> u32 {
    let step_secs = step.seconds();
    let elapsed = epoch_seconds.rem_euclid(i64::from(step_secs));
    // rem_euclid is in [0, step), which always fits u32.
    let elapsed = u32::try_from(elapsed).unwrap_or(0);
    step_secs.saturating_sub(elapsed)
}

/// Whole seconds since the Unix epoch, floored.
///
/// Instants before 1970 yield negative values; half a second before the
/// epoch is second `-1`.
#[must_use]
pub fn epoch_seconds(instant: SystemTime) -> i64 {
    match instant.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let whole = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            let floored = if before.subsec_nanos() > 0 {
                whole.saturating_add(1)
            } else {
                whole
            };
            floored.saturating_neg()
        }
    }
}

/// Current wall-clock time as epoch seconds.
#[must_use]
pub fn unix_now() -> i64 {
    epoch_seconds(SystemTime::now())
}
