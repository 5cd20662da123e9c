//! RFC 6238 TOTP generation and validation.
//!
//! Composes counter derivation, HOTP truncation and the window policy into
//! the caller-facing operations. Every function is a pure function of its
//! arguments: no clock reads, no shared state, no logging.

use crate::code::OtpCode;
use crate::config::OtpConfig;
use crate::counter::{counter_for, remaining_validity, Counter};
use crate::hotp::generate_hotp;
use crate::secret::SharedSecret;
use crate::window::{candidate_counters, scan};
use crate::OtpError;

/// A freshly generated code together with the counter it was derived from.
///
/// Callers that can transport `counter` alongside the code should store it
/// and validate with [`validate_pinned`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    /// The rendered code.
    pub code: OtpCode,
    /// Counter the code was derived from.
    pub counter: Counter,
    /// Seconds until the counter advances.
    pub valid_for_seconds: u32,
}

/// Generate the TOTP code for epoch second `at`.
///
/// # Errors
/// Returns `OtpError::InvalidConfig` if `config` fails
/// [`OtpConfig::check`].
#[must_use = "OTP code should be used or stored"]
pub fn generate(secret: &SharedSecret, at: i64, config: &OtpConfig) -> Result<OtpCode, OtpError> {
    let config = config.check()?;
    let counter = counter_for(at, config.time_step);
    Ok(generate_hotp(secret, counter, config.digits, config.algorithm))
}

/// Generate a code and return the counter and remaining lifetime with it.
///
/// # Errors
/// Returns `OtpError::InvalidConfig` if `config` fails
/// [`OtpConfig::check`].
#[must_use = "OTP code should be used or stored"]
pub fn generate_issued(
    secret: &SharedSecret,
    at: i64,
    config: &OtpConfig,
) -> Result<IssuedOtp, OtpError> {
    let config = config.check()?;
    let counter = counter_for(at, config.time_step);
    Ok(IssuedOtp {
        code: generate_hotp(secret, counter, config.digits, config.algorithm),
        counter,
        valid_for_seconds: remaining_validity(at, config.time_step),
    })
}

/// Validate `code` at epoch second `at` using the rolling window from
/// `config`.
///
/// Returns `Ok(false)` for a well-formed code that does not match.
///
/// # Errors
/// - `OtpError::InvalidCodeFormat` if `code` is not exactly
///   `config.digits` decimal characters.
/// - `OtpError::InvalidConfig` if `config` fails [`OtpConfig::check`].
#[must_use = "validation result should be checked"]
pub fn validate(
    secret: &SharedSecret,
    code: &str,
    at: i64,
    config: &OtpConfig,
) -> Result<bool, OtpError> {
    validate_counter(secret, code, at, config).map(|matched| matched.is_some())
}

/// Like [`validate`], but report which counter matched.
///
/// Callers can persist the returned counter and refuse any later code at
/// or below it, which blocks replay inside the window. When several
/// counters in the window share the code, the most recent one is reported.
///
/// # Errors
/// Same as [`validate`].
#[must_use = "validation result should be checked"]
pub fn validate_counter(
    secret: &SharedSecret,
    code: &str,
    at: i64,
    config: &OtpConfig,
) -> Result<Option<Counter>, OtpError> {
    let config = config.check()?;
    let presented = OtpCode::parse(code, config.digits)?;
    let now = counter_for(at, config.time_step);
    let candidates = candidate_counters(now, config.window, config.window_policy);
    Ok(scan(candidates, &presented, |counter| {
        generate_hotp(secret, counter, config.digits, config.algorithm)
    }))
}

/// Validate `code` against exactly one counter remembered at generation
/// time. No window search; `config.window` and `config.window_policy` are
/// ignored.
///
/// # Errors
/// - `OtpError::InvalidCodeFormat` if `code` is not exactly
///   `config.digits` decimal characters.
/// - `OtpError::InvalidConfig` if `config` fails [`OtpConfig::check`].
#[must_use = "validation result should be checked"]
pub fn validate_pinned(
    secret: &SharedSecret,
    code: &str,
    counter: Counter,
    config: &OtpConfig,
) -> Result<bool, OtpError> {
    let config = config.check()?;
    let presented = OtpCode::parse(code, config.digits)?;
    let expected = generate_hotp(secret, counter, config.digits, config.algorithm);
    Ok(expected.ct_eq(&presented))
}
