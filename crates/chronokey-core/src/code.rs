//! Fixed-width decimal OTP codes.

use std::fmt;

use subtle::ConstantTimeEq;

use crate::hotp::OtpDigits;
use crate::OtpError;

/// A code of exactly `digits` ASCII decimal characters.
///
/// Leading zeros are significant: `"000123"` and `"123"` are different
/// codes, and only the first is a well-formed 6-digit code. Equality is
/// constant-time over the bytes.
#[derive(Clone)]
pub struct OtpCode(String);

impl OtpCode {
    /// Render a truncated value as a zero-padded code.
    ///
    /// Values at or above `10^digits` are reduced modulo `10^digits`.
    #[must_use]
    pub fn render(value: u32, digits: OtpDigits) -> Self {
        let reduced = value.checked_rem(digits.modulus()).unwrap_or(value);
        let width = usize::from(digits.value());
        Self(format!("{reduced:0>width$}"))
    }

    /// Parse a presented code, checking its shape against `digits`.
    ///
    /// # Errors
    /// Returns `OtpError::InvalidCodeFormat` unless `text` is exactly
    /// `digits` ASCII decimal characters (no sign, no whitespace).
    pub fn parse(text: &str, digits: OtpDigits) -> Result<Self, OtpError> {
        let well_formed = text.len() == usize::from(digits.value())
            && text.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(OtpError::InvalidCodeFormat {
                expected: digits.value(),
            });
        }
        Ok(Self(text.to_owned()))
    }

    /// The code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits in the code.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for a constructed code; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Constant-time comparison of the code bytes.
    ///
    /// Length is public (it is the configured digit count), so a length
    /// mismatch may return early; the byte contents never do.
    #[must_use]
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl PartialEq for OtpCode {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for OtpCode {}

impl PartialEq<str> for OtpCode {
    fn eq(&self, other: &str) -> bool {
        self.0.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl PartialEq<&str> for OtpCode {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Masked: a live code is a credential until its window passes, so it
/// stays out of logs and panic messages. Use `Display` or [`OtpCode::as_str`]
/// to show it deliberately.
impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(***)")
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OtpCode> for String {
    fn from(code: OtpCode) -> Self {
        code.0
    }
}
