use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A validated short code identifier for a link.
///
/// Short codes are 6-8 characters long and contain only ASCII letters and
/// digits (`^[A-Za-z0-9]{6,8}$`). Codes this short always fit inline in a
/// [`SmolStr`], so cloning never allocates.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(SmolStr);

pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 8;

/// Characters a short code may be built from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators, rows read back from storage).
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    /// Returns `true` iff `candidate` matches `^[A-Za-z0-9]{6,8}$`.
    pub fn is_valid_format(candidate: &str) -> bool {
        Self::validate(candidate).is_ok()
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), CoreError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only letters and digits: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0.into()
    }
}
