//! Per-call engine configuration.
//!
//! One value bundles every tunable so generation and validation can never
//! disagree on time step, width or hash. There is no process-wide default
//! baked into the algorithms; [`OtpConfig::default`] is just a value.

use serde::{Deserialize, Serialize};

use crate::counter::TimeStep;
use crate::hotp::{OtpAlgorithm, OtpDigits};
use crate::window::{window_for_validity, WindowPolicy, DEFAULT_WINDOW, MAX_WINDOW};
use crate::OtpError;

/// Parameters for [`generate`](crate::generate) and
/// [`validate`](crate::validate).
///
/// Deserializes from camelCase JSON; every field is optional and falls
/// back to the documented default. Unknown keys are rejected so a typo
/// cannot silently leave a field at its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OtpConfig {
    /// Seconds per counter tick (default 30).
    #[serde(default)]
    pub time_step: TimeStep,

    /// Code width (default 6).
    #[serde(default)]
    pub digits: OtpDigits,

    /// HMAC hash (default SHA1). Serialized as `hashAlgorithm`; the short
    /// key `algorithm` is accepted on input.
    #[serde(default, rename = "hashAlgorithm", alias = "algorithm")]
    pub algorithm: OtpAlgorithm,

    /// Rolling-window radius in steps (default 1, at most 10).
    #[serde(default = "default_window")]
    pub window: u32,

    /// Which side(s) of "now" the window covers (default past-only).
    #[serde(default)]
    pub window_policy: WindowPolicy,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            time_step: TimeStep::DEFAULT,
            digits: OtpDigits::Six,
            algorithm: OtpAlgorithm::Sha1,
            window: DEFAULT_WINDOW,
            window_policy: WindowPolicy::PastOnly,
        }
    }
}

const fn default_window() -> u32 {
    DEFAULT_WINDOW
}

impl OtpConfig {
    /// Parse a JSON configuration document and check it.
    ///
    /// # Errors
    /// - `OtpError::UnsupportedAlgorithm` for an unknown hash name or
    ///   digit count.
    /// - `OtpError::InvalidConfig` for malformed JSON, a zero time step,
    ///   or a window above [`MAX_WINDOW`].
    pub fn from_json(text: &str) -> Result<Self, OtpError> {
        let config: Self = serde_json::from_str(text).map_err(|e| classify_json_error(&e))?;
        config.check()
    }

    /// Reject configurations the engine cannot honour.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidConfig` if the window exceeds
    /// [`MAX_WINDOW`]. All other fields are valid by construction.
    pub fn check(self) -> Result<Self, OtpError> {
        if self.window > MAX_WINDOW {
            return Err(OtpError::InvalidConfig(format!(
                "window {} exceeds the maximum of {MAX_WINDOW} steps",
                self.window
            )));
        }
        Ok(self)
    }

    /// Override the time step.
    #[must_use]
    pub const fn with_time_step(mut self, time_step: TimeStep) -> Self {
        self.time_step = time_step;
        self
    }

    /// Override the code width.
    #[must_use]
    pub const fn with_digits(mut self, digits: OtpDigits) -> Self {
        self.digits = digits;
        self
    }

    /// Override the hash algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: OtpAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Override the window radius.
    #[must_use]
    pub const fn with_window(mut self, window: u32) -> Self {
        self.window = window;
        self
    }

    /// Override the window policy.
    #[must_use]
    pub const fn with_window_policy(mut self, window_policy: WindowPolicy) -> Self {
        self.window_policy = window_policy;
        self
    }

    /// Derive the window from a total validity span in seconds:
    /// `floor(validity / time_step / 2)`.
    #[must_use]
    pub fn with_validity(mut self, validity_seconds: u32) -> Self {
        self.window = window_for_validity(validity_seconds, self.time_step);
        self
    }
}

const UNSUPPORTED_PREFIX: &str = "unsupported algorithm: ";
const INVALID_PREFIX: &str = "invalid configuration: ";

/// Map a serde error back onto the engine taxonomy.
///
/// Field converters report through `OtpError`'s Display text, so an
/// unsupported algorithm stays distinguishable from broken JSON. The
/// variant prefix is stripped so it is not repeated on re-wrapping.
fn classify_json_error(err: &serde_json::Error) -> OtpError {
    let message = err.to_string();
    if let Some(rest) = message.strip_prefix(UNSUPPORTED_PREFIX) {
        OtpError::UnsupportedAlgorithm(rest.to_owned())
    } else if let Some(rest) = message.strip_prefix(INVALID_PREFIX) {
        OtpError::InvalidConfig(rest.to_owned())
    } else {
        OtpError::InvalidConfig(message)
    }
}
