//! Error type shared by the authorization and API clients
//!
//! Failures are returned as values; nothing here panics past the client
//! boundary. The handler layer decides whether an error means "sign in again"
//! or "show the message".

use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or connection failure before a response was received
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx from the authorize/token endpoint
    #[error("identity provider returned HTTP {status}: {body}")]
    AuthProvider { status: u16, body: String },

    /// Non-2xx from the resource API
    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// 2xx response whose body lacks a required field or is not the expected JSON
    #[error("malformed response (HTTP {status}): {reason}")]
    MalformedResponse {
        status: u16,
        reason: String,
        body: String,
    },

    /// Session holds no access token
    #[error("not signed in")]
    NotSignedIn,

    /// Session holds a token record that cannot be read back
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// Endpoint or registration settings that cannot be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// HTTP status carried by provider/API failures, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthProvider { status, .. }
            | Error::Api { status, .. }
            | Error::MalformedResponse { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the caller must restart the sign-in flow.
    pub fn requires_sign_in(&self) -> bool {
        matches!(
            self,
            Error::NotSignedIn | Error::InvalidSession(_) | Error::AuthProvider { .. }
        ) || self.status() == Some(401)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_extraction() {
        let err = Error::Api {
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(Error::NotSignedIn.status(), None);
    }

    #[test]
    fn test_requires_sign_in() {
        assert!(Error::NotSignedIn.requires_sign_in());
        assert!(Error::Api {
            status: 401,
            body: String::new()
        }
        .requires_sign_in());
        assert!(!Error::Api {
            status: 500,
            body: String::new()
        }
        .requires_sign_in());
    }
}
