//! `chronokey validate`

use std::io::Write;

use chronokey_core::{validate_counter, validate_pinned, Counter, OtpConfig};

use super::{instant_or_now, load_secret};
use crate::{CliError, Outcome, SecretArgs};

/// Check `code` and print `valid` or `invalid`.
///
/// With `counter`, only that exact counter is accepted; otherwise the
/// configured rolling window around `at` (default: now) is searched.
///
/// # Errors
/// Returns `CliError::Otp` for a malformed secret, a malformed code or a
/// rejected configuration, `CliError::Output` if writing fails. A
/// well-formed wrong code is `Ok(Outcome::Rejected)`, not an error.
pub fn run<W: Write>(
    secret: SecretArgs,
    code: &str,
    at: Option<i64>,
    counter: Option<i64>,
    config: &OtpConfig,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let secret = load_secret(secret)?;

    let valid = if let Some(counter) = counter.map(Counter::new) {
        let valid = validate_pinned(&secret, code, counter, config)?;
        tracing::info!(%counter, valid, "pinned code checked");
        valid
    } else {
        let at = instant_or_now(at);
        let matched = validate_counter(&secret, code, at, config)?;
        tracing::info!(
            at,
            window = config.window,
            policy = %config.window_policy,
            valid = matched.is_some(),
            "code checked"
        );
        if let Some(matched) = matched {
            tracing::debug!(counter = %matched, "matched counter");
        }
        matched.is_some()
    };

    writeln!(out, "{}", if valid { "valid" } else { "invalid" })?;
    Ok(if valid {
        Outcome::Success
    } else {
        Outcome::Rejected
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::rfc_secret;
    use chronokey_core::{OtpError, WindowPolicy};

    fn check(code: &str, at: Option<i64>, counter: Option<i64>, config: &OtpConfig) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run(rfc_secret(), code, at, counter, config, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn accepts_current_code() {
        let (outcome, text) = check("755224", Some(10), None, &OtpConfig::default());
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(text, "valid\n");
    }

    #[test]
    fn accepts_previous_step_within_window() {
        let (outcome, _) = check("755224", Some(40), None, &OtpConfig::default());
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn rejects_future_code_under_past_only() {
        let config = OtpConfig::default().with_window_policy(WindowPolicy::PastOnly);
        let (outcome, text) = check("287082", Some(10), None, &config);
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(text, "invalid\n");
    }

    #[test]
    fn pinned_counter_accepts_only_exact_match() {
        let config = OtpConfig::default();
        assert_eq!(check("287082", None, Some(1), &config).0, Outcome::Success);
        assert_eq!(check("287082", None, Some(2), &config).0, Outcome::Rejected);
    }

    #[test]
    fn malformed_code_is_an_error() {
        let mut out = Vec::new();
        let err = run(rfc_secret(), "12345", Some(0), None, &OtpConfig::default(), &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Otp(OtpError::InvalidCodeFormat { expected: 6 })
        ));
        assert!(out.is_empty(), "nothing is printed for a malformed code");
    }
}
