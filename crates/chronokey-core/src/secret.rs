//! Shared-secret key material: generation, textual transport, hygiene.
//!
//! [`SharedSecret`] holds the HMAC key in a `secrecy` container so the
//! bytes are zeroed when the value is dropped, on every exit path. The
//! allocation is `mlock`ed on Unix where permitted (soft fallback), and
//! `Debug`/`Display` are masked.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretSlice};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::OtpError;

/// Shortest accepted key, in bytes (128 bits).
pub const MIN_SECRET_LEN: usize = 16;

/// Longest accepted key, in bytes (one SHA-512 block, 1024 bits).
pub const MAX_SECRET_LEN: usize = 128;

/// Key size recommended for HMAC-SHA1 (RFC 4226 §4, R6).
pub const DEFAULT_SECRET_BITS: usize = 160;

// ── SharedSecret ────────────────────────────────────────────────────

/// Symmetric HMAC key shared between the engine and the code holder.
///
/// The engine never persists it; callers own it and hand it in per call.
pub struct SharedSecret {
    // Unlocked in `Drop` while the allocation is still live; `inner`
    // zeroizes and frees it afterwards.
    lock: LockedRegion,
    inner: SecretSlice<u8>,
}

impl SharedSecret {
    /// Copy `bytes` into a new protected allocation.
    ///
    /// The caller should zeroize its own copy afterwards.
    ///
    /// # Errors
    /// Returns `OtpError::MalformedSecret` if the key is shorter than
    /// [`MIN_SECRET_LEN`] or longer than [`MAX_SECRET_LEN`] bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, OtpError> {
        if !(MIN_SECRET_LEN..=MAX_SECRET_LEN).contains(&bytes.len()) {
            return Err(OtpError::MalformedSecret(format!(
                "key is {} bytes, expected {MIN_SECRET_LEN}..={MAX_SECRET_LEN}",
                bytes.len()
            )));
        }
        let inner: SecretSlice<u8> = bytes.to_vec().into();
        let exposed = inner.expose_secret();
        let lock = LockedRegion::try_lock(exposed.as_ptr(), exposed.len());
        Ok(Self { inner, lock })
    }

    /// Borrow the raw key bytes for an HMAC computation.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Key length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Always `false`; construction rejects short keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key length in bits.
    #[must_use]
    pub fn bit_length(&self) -> usize {
        self.len().saturating_mul(8)
    }

    /// Whether the backing memory is currently `mlock`ed.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.locked
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.lock.release();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

impl fmt::Display for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

// ── Generation ──────────────────────────────────────────────────────

/// Generate `bit_length` bits of key material from the OS CSPRNG.
///
/// 160 bits suits HMAC-SHA1, 256 bits HMAC-SHA256.
///
/// # Errors
/// - `OtpError::InvalidConfig` if `bit_length` is not a multiple of 8 or
///   falls outside the accepted key range.
/// - `OtpError::CryptoProviderUnavailable` if the OS random source fails.
pub fn generate_secret(bit_length: usize) -> Result<SharedSecret, OtpError> {
    if bit_length % 8 != 0 {
        return Err(OtpError::InvalidConfig(format!(
            "key length {bit_length} bits is not a whole number of bytes"
        )));
    }
    let len = bit_length / 8;
    if !(MIN_SECRET_LEN..=MAX_SECRET_LEN).contains(&len) {
        return Err(OtpError::InvalidConfig(format!(
            "key length {bit_length} bits outside {}..={} bits",
            MIN_SECRET_LEN.saturating_mul(8),
            MAX_SECRET_LEN.saturating_mul(8)
        )));
    }

    let mut bytes = vec![0u8; len];
    let filled = OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        OtpError::CryptoProviderUnavailable(format!("OS random source failed: {e}"))
    });
    let result = filled.and_then(|()| SharedSecret::new(&bytes));
    bytes.zeroize();
    result
}

// ── Textual encoding ────────────────────────────────────────────────

/// Reversible text encodings for storing or transmitting a secret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretEncoding {
    /// RFC 4648 base64 with padding.
    #[default]
    Base64,
    /// RFC 4648 base32 with padding (authenticator-app format).
    Base32,
}

impl SecretEncoding {
    fn codec(self) -> data_encoding::Encoding {
        match self {
            Self::Base64 => data_encoding::BASE64,
            Self::Base32 => data_encoding::BASE32,
        }
    }

    /// Lowercase name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base32 => "base32",
        }
    }
}

impl FromStr for SecretEncoding {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64" | "b64" => Ok(Self::Base64),
            "base32" | "b32" => Ok(Self::Base32),
            _ => Err(OtpError::InvalidConfig(format!(
                "unknown secret encoding {s:?} (expected base64 or base32)"
            ))),
        }
    }
}

impl fmt::Display for SecretEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode a secret as base64.
#[must_use]
pub fn encode_secret(secret: &SharedSecret) -> String {
    encode_secret_with(secret, SecretEncoding::Base64)
}

/// Decode a base64 secret.
///
/// # Errors
/// Returns `OtpError::MalformedSecret` on invalid base64 or a key length
/// outside the accepted range.
pub fn decode_secret(text: &str) -> Result<SharedSecret, OtpError> {
    decode_secret_with(text, SecretEncoding::Base64)
}

/// Encode a secret with an explicit encoding.
#[must_use]
pub fn encode_secret_with(secret: &SharedSecret, encoding: SecretEncoding) -> String {
    encoding.codec().encode(secret.expose())
}

/// Decode a secret with an explicit encoding.
///
/// Base32 input is accepted in either case and with or without `=`
/// padding; surrounding whitespace is ignored for both encodings.
///
/// # Errors
/// Returns `OtpError::MalformedSecret` on invalid input or a key length
/// outside the accepted range. The message never echoes the input.
pub fn decode_secret_with(text: &str, encoding: SecretEncoding) -> Result<SharedSecret, OtpError> {
    let trimmed = text.trim();
    let mut bytes = match encoding {
        SecretEncoding::Base32 => data_encoding::BASE32_NOPAD
            .decode(trimmed.trim_end_matches('=').to_ascii_uppercase().as_bytes()),
        SecretEncoding::Base64 => encoding.codec().decode(trimmed.as_bytes()),
    }
    .map_err(|e| {
        OtpError::MalformedSecret(format!("invalid {encoding} at position {}", e.position))
    })?;
    let result = SharedSecret::new(&bytes);
    bytes.zeroize();
    result
}

// ── Memory locking ──────────────────────────────────────────────────

/// Keeps a heap region `mlock`ed until drop.
///
/// Failure to lock is not an error; the secret is still zeroed on drop.
struct LockedRegion {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: the pointer is only passed to mlock/munlock, which are
// thread-safe. The bytes themselves are owned and accessed through
// `SharedSecret::inner`.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    fn try_lock(ptr: *const u8, len: usize) -> Self {
        let locked = platform::try_mlock(ptr, len);
        Self { ptr, len, locked }
    }
}

impl LockedRegion {
    /// Unlock the range if it is locked. Idempotent.
    fn release(&mut self) {
        if self.locked {
            platform::try_munlock(self.ptr, self.len);
            self.locked = false;
        }
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(unix)]
mod platform {
    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        // SAFETY: `ptr..ptr+len` is a live heap allocation owned by the
        // enclosing SharedSecret. An EPERM/ENOMEM result is handled.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        // SAFETY: called from Drop before the allocation is released.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }
}

#[cfg(not(unix))]
mod platform {
    pub(super) const fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) const fn try_munlock(_ptr: *const u8, _len: usize) {}
}
