//! Session credentials consumed by the document fetcher.
//!
//! The viewer core never reads a credential store itself; the host injects a
//! [`SessionCredentialProvider`] and the fetcher asks it once per open.

/// Environment variable holding the session identifier.
pub const SESSION_ID_ENV: &str = "DOCVIEW_SESSION_ID";

/// Environment variable holding the bearer token.
pub const BEARER_TOKEN_ENV: &str = "DOCVIEW_BEARER_TOKEN";

/// Session identifier and bearer token sent with every document request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub session_id: String,
    pub bearer_token: String,
}

impl Credentials {
    pub fn new(session_id: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            bearer_token: bearer_token.into(),
        }
    }

    /// Both parts present and not just whitespace.
    pub fn is_complete(&self) -> bool {
        !self.session_id.trim().is_empty() && !self.bearer_token.trim().is_empty()
    }
}

// Tokens must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("session_id", &self.session_id)
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

/// Source of the current session's credentials.
pub trait SessionCredentialProvider: Send + Sync {
    /// Current credentials. May be incomplete if the session has lapsed.
    fn credentials(&self) -> Credentials;
}

/// Provider returning a fixed pair, for hosts that already hold the session.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(session_id: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self(Credentials::new(session_id, bearer_token))
    }
}

impl SessionCredentialProvider for StaticCredentials {
    fn credentials(&self) -> Credentials {
        self.0.clone()
    }
}

/// Provider reading [`SESSION_ID_ENV`] and [`BEARER_TOKEN_ENV`] on every call.
///
/// Missing variables yield empty fields, which the fetcher reports as
/// `AuthMissing` instead of sending an unauthenticated request.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl SessionCredentialProvider for EnvCredentials {
    fn credentials(&self) -> Credentials {
        let read = |name: &str| std::env::var(name).unwrap_or_default();
        Credentials::new(read(SESSION_ID_ENV), read(BEARER_TOKEN_ENV))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_credentials() {
        assert!(Credentials::new("sess-1", "tok").is_complete());
    }

    #[test]
    fn test_incomplete_credentials() {
        assert!(!Credentials::new("", "tok").is_complete());
        assert!(!Credentials::new("sess-1", "").is_complete());
        assert!(!Credentials::new("sess-1", "   ").is_complete());
        assert!(!Credentials::default().is_complete());
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("sess-1", "super-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("sess-1"));
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn test_static_provider_returns_same_pair() {
        let provider = StaticCredentials::new("sess-1", "tok");
        assert_eq!(provider.credentials(), Credentials::new("sess-1", "tok"));
    }
}
