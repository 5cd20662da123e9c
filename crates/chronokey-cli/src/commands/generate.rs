//! `chronokey generate`

use std::io::Write;

use chronokey_core::{generate_issued, OtpConfig};

use super::{instant_or_now, load_secret};
use crate::{CliError, Outcome, SecretArgs};

/// Print the code for `at` (default: now), optionally with its counter.
///
/// # Errors
/// Returns `CliError::Otp` for a malformed secret or rejected
/// configuration, `CliError::Output` if writing fails.
pub fn run<W: Write>(
    secret: SecretArgs,
    at: Option<i64>,
    show_counter: bool,
    config: &OtpConfig,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let secret = load_secret(secret)?;
    let at = instant_or_now(at);
    let issued = generate_issued(&secret, at, config)?;

    if show_counter {
        writeln!(out, "{} {}", issued.code, issued.counter)?;
    } else {
        writeln!(out, "{}", issued.code)?;
    }

    tracing::info!(
        at,
        step = config.time_step.seconds(),
        digits = config.digits.value(),
        algorithm = %config.algorithm,
        valid_for = issued.valid_for_seconds,
        "code generated"
    );
    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::rfc_secret;
    use chronokey_core::{OtpDigits, OtpError, SecretEncoding};

    fn output_of(at: i64, show_counter: bool, config: &OtpConfig) -> String {
        let mut out = Vec::new();
        run(rfc_secret(), Some(at), show_counter, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_rfc_code_at_epoch() {
        assert_eq!(output_of(0, false, &OtpConfig::default()), "755224\n");
    }

    #[test]
    fn prints_counter_on_request() {
        assert_eq!(output_of(59, true, &OtpConfig::default()), "287082 1\n");
    }

    #[test]
    fn honours_digit_configuration() {
        let config = OtpConfig::default().with_digits(OtpDigits::Eight);
        assert_eq!(output_of(59, false, &config), "94287082\n");
    }

    #[test]
    fn malformed_secret_is_reported() {
        let args = SecretArgs {
            secret: "%%%".to_owned(),
            encoding: SecretEncoding::Base64,
        };
        let mut out = Vec::new();
        let err = run(args, Some(0), false, &OtpConfig::default(), &mut out).unwrap_err();
        assert!(matches!(err, CliError::Otp(OtpError::MalformedSecret(_))));
    }
}
