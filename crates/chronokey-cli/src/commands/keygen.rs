//! `chronokey keygen`

use std::io::Write;

use chronokey_core::{encode_secret_with, generate_secret, SecretEncoding};
use zeroize::Zeroize;

use crate::{CliError, Outcome};

/// Print a fresh secret of `bits` bits in `encoding`.
///
/// # Errors
/// Returns `CliError::Otp` for an unsupported key size or an unavailable
/// random source, `CliError::Output` if writing fails.
pub fn run<W: Write>(bits: usize, encoding: SecretEncoding, out: &mut W) -> Result<Outcome, CliError> {
    let secret = generate_secret(bits)?;
    let mut text = encode_secret_with(&secret, encoding);
    let written = writeln!(out, "{text}");
    text.zeroize();
    written?;

    tracing::info!(bits, encoding = %encoding, "secret generated");
    Ok(Outcome::Success)
}
