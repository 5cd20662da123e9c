//! Acceptance window around a counter (RFC 6238 §5.2).
//!
//! A policy picks which neighbouring counters are tried; [`scan`] then
//! compares every candidate in constant time without stopping at the
//! first hit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::code::OtpCode;
use crate::counter::{Counter, TimeStep};
use crate::OtpError;

/// Default window radius: one step of tolerance.
pub const DEFAULT_WINDOW: u32 = 1;

/// Largest accepted window radius. Keeps validation to a handful of HMACs.
pub const MAX_WINDOW: u32 = 10;

/// Which side(s) of the current counter a rolling window covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowPolicy {
    /// Offsets `[-W, 0]`: codes from the future are rejected.
    #[default]
    PastOnly,
    /// Offsets `[-W, +W]`.
    Symmetric,
}

impl WindowPolicy {
    /// Name used in configuration files and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PastOnly => "pastOnly",
            Self::Symmetric => "symmetric",
        }
    }

    /// Inclusive offset range tried for a window of radius `window`.
    #[must_use]
    pub fn offsets(self, window: u32) -> (i64, i64) {
        let radius = i64::from(window);
        match self {
            Self::PastOnly => (radius.saturating_neg(), 0),
            Self::Symmetric => (radius.saturating_neg(), radius),
        }
    }
}

impl FromStr for WindowPolicy {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "pastonly" | "past" => Ok(Self::PastOnly),
            "symmetric" => Ok(Self::Symmetric),
            _ => Err(OtpError::InvalidConfig(format!(
                "unknown window policy {s:?} (expected pastOnly or symmetric)"
            ))),
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Window radius for a total validity span: `floor(validity / step / 2)`.
#[must_use]
pub fn window_for_validity(validity_seconds: u32, step: TimeStep) -> u32 {
    validity_seconds
        .checked_div(step.seconds())
        .unwrap_or(0)
        .checked_div(2)
        .unwrap_or(0)
}

/// Counters tried around `center`, oldest first.
///
/// Offsets that would leave the `i64` range are skipped.
pub fn candidate_counters(
    center: Counter,
    window: u32,
    policy: WindowPolicy,
) -> impl Iterator<Item = Counter> {
    let (low, high) = policy.offsets(window);
    (low..=high).filter_map(move |delta| center.checked_offset(delta))
}

/// Compare `presented` against the code of every candidate counter.
///
/// Every candidate is computed and compared; the loop never exits early.
/// When more than one counter matches, the most recent one wins.
pub(crate) fn scan<I, F>(candidates: I, presented: &OtpCode, mut expected: F) -> Option<Counter>
where
    I: IntoIterator<Item = Counter>,
    F: FnMut(Counter) -> OtpCode,
{
    let mut found = Choice::from(0);
    let mut matched = 0i64;
    for counter in candidates {
        let code = expected(counter);
        let hit = code.as_str().as_bytes().ct_eq(presented.as_str().as_bytes());
        matched = i64::conditional_select(&matched, &counter.value(), hit);
        found |= hit;
    }
    bool::from(found).then(|| Counter::new(matched))
}
