//! Configuration resolution: defaults, then the JSON file, then flags.

use std::fs;
use std::path::Path;

use chronokey_core::{OtpConfig, OtpDigits, TimeStep};

use crate::{CliError, ConfigArgs};

/// Build the effective configuration for this invocation.
///
/// A file that exists but does not parse is an error; it is never
/// replaced by defaults.
///
/// # Errors
/// Returns `CliError::ReadConfig` for an unreadable file and
/// `CliError::Otp` for invalid content or flag values.
pub fn resolve(args: &ConfigArgs) -> Result<OtpConfig, CliError> {
    let mut config = match &args.file {
        Some(path) => load(path)?,
        None => OtpConfig::default(),
    };

    if let Some(step) = args.step {
        config = config.with_time_step(TimeStep::new(step)?);
    }
    if let Some(digits) = args.digits {
        config = config.with_digits(OtpDigits::try_from(digits)?);
    }
    if let Some(algorithm) = args.algorithm {
        config = config.with_algorithm(algorithm);
    }
    if let Some(policy) = args.policy {
        config = config.with_window_policy(policy);
    }
    // Validity depends on the final step, so it is applied last.
    if let Some(window) = args.window {
        config = config.with_window(window);
    }
    if let Some(validity) = args.validity {
        config = config.with_validity(validity);
    }

    Ok(config.check()?)
}

/// Read and parse a JSON configuration file.
///
/// # Errors
/// Returns `CliError::ReadConfig` if the file cannot be read and
/// `CliError::Otp` if its content is rejected.
pub fn load(path: &Path) -> Result<OtpConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(OtpConfig::from_json(&text)?)
}
