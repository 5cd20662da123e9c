//! `chronokey` command-line shell.
//!
//! A thin caller of `chronokey-core`: parses arguments, resolves the
//! configuration, runs one operation and reports the result. Logs carry
//! only non-sensitive metadata (timestamps, configuration, pass/fail).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod commands;
pub mod config;
pub mod error;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chronokey_core::{OtpAlgorithm, SecretEncoding, WindowPolicy, DEFAULT_SECRET_BITS};
use clap::{Args, Parser, Subcommand};

pub use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "chronokey")]
#[command(version, about = "Time-based one-time password generator and validator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Configuration sources, applied in order: defaults, file, flags.
#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// JSON configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Seconds per time step
    #[arg(long, value_name = "SECONDS", global = true)]
    pub step: Option<u32>,

    /// Code width (6, 7 or 8)
    #[arg(long, global = true)]
    pub digits: Option<u8>,

    /// HMAC hash (SHA1, SHA256, SHA512)
    #[arg(long, global = true)]
    pub algorithm: Option<OtpAlgorithm>,

    /// Window radius in steps
    #[arg(long, global = true, conflicts_with = "validity")]
    pub window: Option<u32>,

    /// Total validity span in seconds; window = validity / step / 2
    #[arg(long, value_name = "SECONDS", global = true)]
    pub validity: Option<u32>,

    /// Window policy (pastOnly, symmetric)
    #[arg(long, global = true)]
    pub policy: Option<WindowPolicy>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new random shared secret
    Keygen {
        /// Key length in bits (multiple of 8, 128..=1024)
        #[arg(long, default_value_t = DEFAULT_SECRET_BITS)]
        bits: usize,

        /// Output encoding (base64, base32)
        #[arg(long, default_value = "base64")]
        encoding: SecretEncoding,
    },

    /// Print the code for now, or for --at
    Generate {
        #[command(flatten)]
        secret: SecretArgs,

        /// Epoch seconds to generate for (default: now)
        #[arg(long, allow_negative_numbers = true)]
        at: Option<i64>,

        /// Also print the counter, for pinned validation
        #[arg(long)]
        show_counter: bool,
    },

    /// Check a presented code; exit status 0 if valid, 1 if not
    Validate {
        #[command(flatten)]
        secret: SecretArgs,

        /// The code to check
        #[arg(long)]
        code: String,

        /// Epoch seconds to validate at (default: now)
        #[arg(long, allow_negative_numbers = true, conflicts_with = "counter")]
        at: Option<i64>,

        /// Counter remembered at generation time (pinned validation)
        #[arg(long, allow_negative_numbers = true)]
        counter: Option<i64>,
    },
}

/// How the shared secret reaches the process.
#[derive(Args)]
pub struct SecretArgs {
    /// Encoded shared secret
    #[arg(long, env = "CHRONOKEY_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Secret encoding (base64, base32)
    #[arg(long, default_value = "base64")]
    pub encoding: SecretEncoding,
}

impl std::fmt::Debug for SecretArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretArgs")
            .field("secret", &"***")
            .field("encoding", &self.encoding)
            .finish()
    }
}

/// Result of a command that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Command succeeded (or the code was accepted).
    Success,
    /// The presented code was well-formed but did not match.
    Rejected,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Rejected => Self::from(1u8),
        }
    }
}

/// Run the parsed command, writing results to `out`.
///
/// # Errors
/// Returns `CliError` for unreadable configuration, malformed input, or a
/// failed write to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<Outcome, CliError> {
    let config = config::resolve(&cli.config)?;
    match cli.command {
        Command::Keygen { bits, encoding } => commands::keygen::run(bits, encoding, out),
        Command::Generate {
            secret,
            at,
            show_counter,
        } => commands::generate::run(secret, at, show_counter, &config, out),
        Command::Validate {
            secret,
            code,
            at,
            counter,
        } => commands::validate::run(secret, &code, at, counter, &config, out),
    }
}
