//! Error taxonomy for `chronokey-core`.
//!
//! Every variant is terminal for the call that raised it. A wrong code is
//! never an error: validation returns `Ok(false)` for that case.

use thiserror::Error;

/// Errors produced by OTP generation, validation and secret handling.
///
/// Messages never carry secret bytes, encoded secret text, HMAC output,
/// or the presented code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// No secure random source (or hash implementation) is available.
    #[error("crypto provider unavailable: {0}")]
    CryptoProviderUnavailable(String),

    /// Secret text could not be decoded, or decoded to an unusable length.
    #[error("malformed secret: {0}")]
    MalformedSecret(String),

    /// Unknown hash algorithm name or unsupported digit count.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Presented code is not exactly `expected` ASCII decimal digits.
    #[error("invalid code format: expected exactly {expected} decimal digits")]
    InvalidCodeFormat {
        /// Configured digit count.
        expected: u8,
    },

    /// Structurally impossible configuration (zero time step, bad key size).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
