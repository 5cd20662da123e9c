//! One module per subcommand.

pub mod generate;
pub mod keygen;
pub mod validate;

use chronokey_core::{decode_secret_with, unix_now, SharedSecret};
use zeroize::Zeroize;

use crate::{CliError, SecretArgs};

/// Decode the secret argument and wipe the encoded text.
fn load_secret(args: SecretArgs) -> Result<SharedSecret, CliError> {
    let SecretArgs {
        mut secret,
        encoding,
    } = args;
    let decoded = decode_secret_with(&secret, encoding);
    secret.zeroize();
    Ok(decoded?)
}

fn instant_or_now(at: Option<i64>) -> i64 {
    at.unwrap_or_else(unix_now)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chronokey_core::SecretEncoding;

    use crate::SecretArgs;

    /// base64("12345678901234567890"), the RFC 4226 test key.
    pub const RFC_SECRET_B64: &str = "MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=";

    pub fn rfc_secret() -> SecretArgs {
        SecretArgs {
            secret: RFC_SECRET_B64.to_owned(),
            encoding: SecretEncoding::Base64,
        }
    }
}
