//! Authentication module for the Microsoft identity platform
//!
//! Implements the OAuth2 authorization-code flow (sign-in URL, code
//! exchange) and refresh-token renewal against the v2.0 endpoints.

pub mod oauth;
pub mod tokens;

use oauth2::{ClientId, ClientSecret, Scope};

pub use oauth::AuthClient;
pub use tokens::{Clock, SystemClock, TokenRecord, TokenState};

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Application registration used for the authorization-code flow
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    /// Identity provider host, e.g. `https://login.microsoftonline.com`
    pub authority: String,
    /// Azure AD tenant (common for multi-tenant)
    pub tenant: String,
    pub scopes: Vec<Scope>,
    /// Redirect URI registered for the app; used when refreshing
    pub redirect_uri: String,
}

impl OAuthConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant: "common".to_string(),
            scopes: Vec::new(),
            redirect_uri: String::new(),
        }
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(|s| Scope::new(s.into())).collect();
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Space-separated scope list as sent on the wire
    pub fn scope_param(&self) -> String {
        self.scopes
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/{}",
            self.authority.trim_end_matches('/'),
            self.tenant,
            name
        )
    }

    pub fn authorize_url(&self) -> String {
        self.endpoint("authorize")
    }

    pub fn token_url(&self) -> String {
        self.endpoint("token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let config = OAuthConfig::new("id", "secret").with_tenant("consumers");
        assert_eq!(
            config.authorize_url(),
            "https://login.microsoftonline.com/consumers/oauth2/v2.0/authorize"
        );
        assert_eq!(
            config.token_url(),
            "https://login.microsoftonline.com/consumers/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_scope_param_joins_with_spaces() {
        let config = OAuthConfig::new("id", "secret").with_scopes(["openid", "Mail.Read"]);
        assert_eq!(config.scope_param(), "openid Mail.Read");
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let config = OAuthConfig::new("id", "hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
