//! RFC 4226 HOTP: HMAC over a counter plus dynamic truncation.
//!
//! Uses `ring::hmac` for HMAC-SHA1, HMAC-SHA256 and HMAC-SHA512. Nothing
//! in this module logs or returns the key, the digest, or the 31-bit
//! intermediate value.

use std::fmt;
use std::str::FromStr;

use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::code::OtpCode;
use crate::counter::Counter;
use crate::secret::SharedSecret;
use crate::OtpError;

// ── OtpAlgorithm ────────────────────────────────────────────────────

/// HMAC hash function used for truncation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OtpAlgorithm {
    /// HMAC-SHA1 (RFC 4226 default, what most authenticator apps expect).
    #[default]
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl OtpAlgorithm {
    /// Canonical name, as written in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }

    fn to_ring_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }
}

impl FromStr for OtpAlgorithm {
    type Err = OtpError;

    /// Accepts `SHA1`, `SHA-1`, `HmacSHA1` and the 256/512 equivalents,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        let bare = normalized.strip_prefix("HMAC").unwrap_or(&normalized);
        match bare {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(OtpError::UnsupportedAlgorithm(format!(
                "unknown hash algorithm {s:?} (expected SHA1, SHA256 or SHA512)"
            ))),
        }
    }
}

impl TryFrom<String> for OtpAlgorithm {
    type Error = OtpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OtpAlgorithm> for String {
    fn from(algorithm: OtpAlgorithm) -> Self {
        algorithm.name().to_owned()
    }
}

impl fmt::Display for OtpAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── OtpDigits ───────────────────────────────────────────────────────

/// Width of a rendered code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OtpDigits {
    /// 6-digit code (standard).
    #[default]
    Six,
    /// 7-digit code.
    Seven,
    /// 8-digit code (RFC 6238 Appendix B).
    Eight,
}

impl OtpDigits {
    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }

    /// `10^digits`, the truncation modulus. Never zero.
    #[must_use]
    pub const fn modulus(self) -> u32 {
        match self {
            Self::Six => 1_000_000,
            Self::Seven => 10_000_000,
            Self::Eight => 100_000_000,
        }
    }
}

impl TryFrom<u8> for OtpDigits {
    type Error = OtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(OtpError::UnsupportedAlgorithm(format!(
                "{other}-digit codes are not supported (expected 6, 7 or 8)"
            ))),
        }
    }
}

impl From<OtpDigits> for u8 {
    fn from(digits: OtpDigits) -> Self {
        digits.value()
    }
}

// ── Truncation ──────────────────────────────────────────────────────

/// `HOTP(K, C) mod 10^digits` as an integer in `[0, 10^digits)`.
///
/// Steps of RFC 4226 §5.3: HMAC over the 8-byte big-endian counter,
/// offset from the low nibble of the last digest byte, 31-bit big-endian
/// read at that offset, reduce modulo `10^digits`.
#[must_use]
pub fn truncated_otp(
    key: &SharedSecret,
    counter: Counter,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> u32 {
    let key = hmac::Key::new(algorithm.to_ring_algorithm(), key.expose());
    let tag = hmac::sign(&key, &counter.to_be_bytes());
    let digest = tag.as_ref();

    // Digests are 20, 32 or 64 bytes; offset ≤ 15 so offset + 3 < 20.
    let last = digest.last().copied().unwrap_or(0);
    let offset = usize::from(last & 0x0F);
    let window = digest.get(offset..offset.saturating_add(4)).unwrap_or(&[0; 4]);
    let binary = u32::from_be_bytes([window[0] & 0x7F, window[1], window[2], window[3]]);

    binary.checked_rem(digits.modulus()).unwrap_or(binary)
}

/// Generate an HOTP code for an explicit counter.
#[must_use = "OTP code should be used or stored"]
pub fn generate_hotp(
    secret: &SharedSecret,
    counter: Counter,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> OtpCode {
    OtpCode::render(truncated_otp(secret, counter, digits, algorithm), digits)
}
