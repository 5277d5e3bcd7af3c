use crate::{PortalError, PortalResult};
use reqwest::header::HeaderValue;
use std::fmt;

/// A bearer token issued by the portal's auth service.
/// The token is held by whoever manages the user session and passed
/// explicitly into every write call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The `Authorization` header value for this credential.
    pub fn header_value(&self) -> PortalResult<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|error| {
            PortalError::InvalidInput(format!("Invalid bearer token header value: {error}"))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token() {
        let credential = Credential::bearer("secret-token");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn header_value_has_bearer_prefix() {
        let credential = Credential::bearer("abc123");
        let value = credential.header_value().expect("valid header");
        assert_eq!(value.to_str().expect("ascii"), "Bearer abc123");
    }

    #[test]
    fn header_value_rejects_newlines() {
        let credential = Credential::bearer("abc\n123");
        assert!(matches!(
            credential.header_value(),
            Err(PortalError::InvalidInput(_))
        ));
    }
}
