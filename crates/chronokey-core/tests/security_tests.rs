#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Security validation test suite for chronokey-core.
//!
//! - CSPRNG entropy quality of generated secrets
//! - Secret masking in formatted output and error messages
//! - Constant-time validation via Welch's t-test

mod security;
