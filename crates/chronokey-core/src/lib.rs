//! `chronokey-core`: stateless TOTP/HOTP engine.
//!
//! Derives short numeric codes from a shared secret and a point in time
//! (RFC 6238 over RFC 4226) and validates presented codes against a rolling
//! window or a pinned counter. Zero I/O, zero async, zero logging: every
//! operation is a pure function of its explicit inputs and is safe to call
//! concurrently with different configurations.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;

pub mod code;
pub mod config;
pub mod counter;
pub mod hotp;
pub mod secret;
pub mod totp;
pub mod window;

pub use code::OtpCode;
pub use config::OtpConfig;
pub use counter::{
    counter_for, epoch_seconds, remaining_validity, unix_now, Counter, TimeStep,
    DEFAULT_TIME_STEP,
};
pub use error::OtpError;
pub use hotp::{generate_hotp, truncated_otp, OtpAlgorithm, OtpDigits};
pub use secret::{
    decode_secret, decode_secret_with, encode_secret, encode_secret_with, generate_secret,
    SecretEncoding, SharedSecret, DEFAULT_SECRET_BITS, MAX_SECRET_LEN, MIN_SECRET_LEN,
};
pub use totp::{generate, generate_issued, validate, validate_counter, validate_pinned, IssuedOtp};
pub use window::{
    candidate_counters, window_for_validity, WindowPolicy, DEFAULT_WINDOW, MAX_WINDOW,
};
