//! OAuth2 authorization-code flow and refresh-token renewal

use oauth2::{AuthUrl, AuthorizationCode, RefreshToken, TokenUrl};
use url::Url;

use super::tokens::{Clock, SystemClock, TokenRecord, TokenResponse, TokenState};
use super::OAuthConfig;
use crate::error::{Error, Result};
use crate::session::SessionStore;

/// Client for the identity provider's authorize and token endpoints
pub struct AuthClient<C = SystemClock> {
    http: reqwest::Client,
    config: OAuthConfig,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    clock: C,
}

impl AuthClient<SystemClock> {
    pub fn new(config: OAuthConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> AuthClient<C> {
    /// Build the client, validating the endpoint URLs derived from the config.
    pub fn with_clock(config: OAuthConfig, clock: C) -> Result<Self> {
        let auth_url = AuthUrl::new(config.authorize_url())
            .map_err(|e| Error::InvalidConfig(format!("authorize URL: {e}")))?;
        let token_url = TokenUrl::new(config.token_url())
            .map_err(|e| Error::InvalidConfig(format!("token URL: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            config,
            auth_url,
            token_url,
            clock,
        })
    }

    /// Sign-in URL the user's browser is sent to.
    pub fn build_signin_url(&self, redirect_uri: &str) -> Url {
        let mut url = self.auth_url.url().clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.config.client_id.as_str())
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scope_param())
            .append_pair("prompt", "login");
        url
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code_for_token(
        &self,
        code: &AuthorizationCode,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        tracing::debug!("Exchanging authorization code at {}", self.token_url.as_str());
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code.secret().as_str()),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// Obtain a new access token from a refresh token.
    pub async fn refresh_token(
        &self,
        refresh_token: &RefreshToken,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        tracing::debug!("Refreshing token at {}", self.token_url.as_str());
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.secret().as_str()),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    async fn request_token(&self, grant: &[(&str, &str)]) -> Result<TokenResponse> {
        let scope = self.config.scope_param();
        let mut form: Vec<(&str, &str)> = grant.to_vec();
        form.push(("scope", scope.as_str()));
        form.push(("client_id", self.config.client_id.as_str()));
        form.push(("client_secret", self.config.client_secret.secret().as_str()));

        // Posted directly rather than through BasicClient: a failed exchange must
        // surface the HTTP status and raw body, and RequestTokenError keeps neither.
        let resp = self
            .http
            .post(self.token_url.url().clone())
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::AuthProvider {
                status: status.as_u16(),
                body,
            });
        }

        TokenResponse::parse(status.as_u16(), &body)
    }

    /// Exchange the code and store the resulting token record in the session.
    pub async fn sign_in_with_code(
        &self,
        session: &mut impl SessionStore,
        code: &AuthorizationCode,
        redirect_uri: &str,
    ) -> Result<TokenRecord> {
        let response = self.exchange_code_for_token(code, redirect_uri).await?;
        let record = TokenRecord::from_response(response, self.clock.now());
        record.store(session);
        tracing::info!("Signed in, token valid until {}", record.expires_at);
        Ok(record)
    }

    pub fn token_state(&self, session: &impl SessionStore) -> TokenState {
        match TokenRecord::load(session) {
            Ok(Some(record)) if !record.is_expired(self.clock.now()) => TokenState::Valid,
            Ok(Some(_)) => TokenState::Expired,
            Ok(None) | Err(_) => TokenState::NoToken,
        }
    }

    /// Return a usable access token, refreshing it first if it has expired.
    ///
    /// The session is borrowed mutably for the whole call, so two refreshes of
    /// the same session cannot interleave. A failed refresh clears the token
    /// record: the caller has to restart the sign-in flow.
    pub async fn get_valid_access_token(&self, session: &mut impl SessionStore) -> Result<String> {
        let record = TokenRecord::load(session)?.ok_or(Error::NotSignedIn)?;

        if !record.is_expired(self.clock.now()) {
            return Ok(record.access_token);
        }

        tracing::info!("Access token expired, refreshing...");
        let refresh = RefreshToken::new(record.refresh_token);
        match self.refresh_token(&refresh, &self.config.redirect_uri).await {
            Ok(response) => {
                let renewed = TokenRecord::from_response(response, self.clock.now());
                renewed.store(session);
                tracing::info!("Token refreshed, valid until {}", renewed.expires_at);
                Ok(renewed.access_token)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                TokenRecord::clear(session);
                Err(e)
            }
        }
    }
}
