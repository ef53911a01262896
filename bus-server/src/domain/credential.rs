//! API credential validation.

use std::fmt;

/// Minimum accepted credential length, after trimming.
pub const MIN_CREDENTIAL_LEN: usize = 8;

/// Maximum accepted credential length, after trimming.
pub const MAX_CREDENTIAL_LEN: usize = 128;

/// Substrings that mark a credential as a copy-pasted placeholder.
const PLACEHOLDERS: [&str; 5] = ["your-api-key", "api-key-here", "enter-key", "test", "demo"];

/// Why a credential string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialRejection {
    #[error("required")]
    Required,

    #[error("too short")]
    TooShort,

    #[error("too long")]
    TooLong,

    #[error("placeholder")]
    Placeholder,
}

/// Check the shape of a credential string.
///
/// Rules are applied in order and the first failure wins:
/// empty, shorter than 8, longer than 128, then a case-insensitive
/// placeholder match. Length is counted in characters of the trimmed input.
pub fn validate(raw: &str) -> Result<(), CredentialRejection> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(CredentialRejection::Required);
    }
    if len < MIN_CREDENTIAL_LEN {
        return Err(CredentialRejection::TooShort);
    }
    if len > MAX_CREDENTIAL_LEN {
        return Err(CredentialRejection::TooLong);
    }

    let lowered = trimmed.to_lowercase();
    if PLACEHOLDERS.iter().any(|p| lowered.contains(p)) {
        return Err(CredentialRejection::Placeholder);
    }

    Ok(())
}

/// A credential that has passed [`validate`].
///
/// Holds the trimmed token. The value is supplied per request and is never
/// stored beyond the request that carries it, so `Debug` does not print it.
///
/// # Examples
///
/// ```
/// use bus_server::domain::Credential;
///
/// let key = Credential::parse("  a-valid-looking-key-01 ").unwrap();
/// assert_eq!(key.as_str(), "a-valid-looking-key-01");
///
/// assert!(Credential::parse("short").is_err());
/// assert!(Credential::parse("demo-key-test").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validate and wrap a raw credential string.
    pub fn parse(raw: &str) -> Result<Self, CredentialRejection> {
        validate(raw)?;
        Ok(Credential(raw.trim().to_string()))
    }

    /// Returns the trimmed token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
