//! Configuration and session file locations

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{ApiClient, ApiSurface};
use crate::auth::{OAuthConfig, DEFAULT_AUTHORITY};

const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/tutorial/gettoken/";

/// Values shipped in sample configs that must be replaced
const PLACEHOLDERS: &[&str] = &["YOUR CLIENT ID", "YOUR CLIENT SECRET"];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// App registration client id
    pub client_id: Option<String>,
    /// App registration client secret
    pub client_secret: Option<String>,
    /// Redirect URI registered for the app
    pub redirect_uri: String,
    pub authority: String,
    /// Azure AD tenant (common for multi-tenant)
    pub tenant: String,
    /// REST surface for mail, calendar and contacts
    pub api_surface: ApiSurface,
    /// Overrides the surface's default base URL
    pub api_base_url: Option<String>,
    /// Requested scopes; the surface's defaults when unset
    pub scopes: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant: "common".to_string(),
            api_surface: ApiSurface::default(),
            api_base_url: None,
            scopes: None,
        }
    }
}

impl Config {
    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "outlook-tutorial", "outlook-tutorial")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get config file path
    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Session file path, next to the config file
    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.toml"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Apply `OUTLOOK_*` overrides from the given lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup("OUTLOOK_CLIENT_ID") {
            self.client_id = Some(id);
        }
        if let Some(secret) = lookup("OUTLOOK_CLIENT_SECRET") {
            self.client_secret = Some(secret);
        }
        if let Some(uri) = lookup("OUTLOOK_REDIRECT_URI") {
            self.redirect_uri = uri;
        }
    }

    /// Registration settings for the auth client. Fails on missing or
    /// placeholder credentials.
    pub fn oauth(&self) -> Result<OAuthConfig> {
        let client_id = required(self.client_id.as_deref(), "client_id", "OUTLOOK_CLIENT_ID")?;
        let client_secret = required(
            self.client_secret.as_deref(),
            "client_secret",
            "OUTLOOK_CLIENT_SECRET",
        )?;

        let scopes: Vec<String> = match &self.scopes {
            Some(scopes) if !scopes.is_empty() => scopes.clone(),
            _ => self
                .api_surface
                .default_scopes()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(OAuthConfig::new(client_id, client_secret)
            .with_authority(&self.authority)
            .with_tenant(&self.tenant)
            .with_scopes(scopes)
            .with_redirect_uri(&self.redirect_uri))
    }

    pub fn api_client(&self) -> ApiClient {
        match &self.api_base_url {
            Some(base) => ApiClient::with_base_url(self.api_surface, base.as_str()),
            None => ApiClient::new(self.api_surface),
        }
    }
}

fn required<'a>(value: Option<&'a str>, key: &str, env: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() && !PLACEHOLDERS.contains(&v) => Ok(v),
        _ => bail!(
            "{} is not configured. Set it in {} or via {}.",
            key,
            Config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".to_string()),
            env
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.api_surface, ApiSurface::Graph);
        assert!(config.oauth().is_err());
    }

    #[test]
    fn test_load_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
client_id = "file-id"
client_secret = "file-secret"
api_surface = "outlook"
scopes = ["openid", "https://outlook.office.com/mail.read"]
"#,
        )
        .unwrap();

        let mut config = Config::load_from(&path).unwrap();
        config.apply_overrides(|key| match key {
            "OUTLOOK_CLIENT_SECRET" => Some("env-secret".to_string()),
            _ => None,
        });

        let oauth = config.oauth().unwrap();
        assert_eq!(oauth.client_id.as_str(), "file-id");
        assert_eq!(oauth.client_secret.secret(), "env-secret");
        assert_eq!(
            oauth.scope_param(),
            "openid https://outlook.office.com/mail.read"
        );
        assert_eq!(config.api_client().surface(), ApiSurface::Outlook);
    }

    #[test]
    fn test_placeholder_credentials_rejected() {
        let config = Config {
            client_id: Some("YOUR CLIENT ID".into()),
            client_secret: Some("real".into()),
            ..Config::default()
        };
        assert!(config.oauth().is_err());
    }

    #[test]
    fn test_default_scopes_follow_surface() {
        let config = Config {
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            ..Config::default()
        };
        let scope = config.oauth().unwrap().scope_param();
        assert!(scope.contains("offline_access"));
        assert!(scope.contains("Mail.Read"));
    }
}
