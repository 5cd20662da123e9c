//! CLI error type.

use std::io;
use std::path::PathBuf;

use chronokey_core::OtpError;
use thiserror::Error;

/// Anything that stops a command from producing a definite answer.
#[derive(Debug, Error)]
pub enum CliError {
    /// The `--config` file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    ReadConfig {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Writing the result to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// Engine rejected the input or configuration.
    #[error(transparent)]
    Otp(#[from] OtpError),
}
