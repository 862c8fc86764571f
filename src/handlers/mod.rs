//! Command handlers
//!
//! One handler per route of the web tutorial: `home` hands out the sign-in
//! link, `gettoken` completes the code exchange, and the listing handlers
//! require a fresh token before calling the API. Handlers return the text to
//! print; the caller owns the session and persists it afterwards.

mod render;

use anyhow::{bail, Context, Result};
use oauth2::AuthorizationCode;
use std::path::Path;
use url::Url;

use crate::api::{self, ApiClient};
use crate::auth::{AuthClient, Clock, SystemClock, TokenRecord, TokenState};
use crate::config::Config;
use crate::error::Error;
use crate::session::{keys, SessionStore};

pub struct App<C = SystemClock> {
    auth: AuthClient<C>,
    api: ApiClient,
    redirect_uri: String,
}

impl App<SystemClock> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let auth = AuthClient::new(config.oauth()?)?;
        Ok(Self::new(auth, config.api_client(), &config.redirect_uri))
    }
}

impl<C: Clock> App<C> {
    pub fn new(auth: AuthClient<C>, api: ApiClient, redirect_uri: &str) -> Self {
        Self {
            auth,
            api,
            redirect_uri: redirect_uri.to_string(),
        }
    }

    /// Sign-in link
    pub fn home(&self) -> String {
        let url = self.auth.build_signin_url(&self.redirect_uri);
        format!(
            "Sign in by visiting:\n\n  {url}\n\n\
             Then run `gettoken` with the URL you were redirected to."
        )
    }

    /// Exchange the code from the redirect and remember who signed in.
    pub async fn gettoken(&self, session: &mut impl SessionStore, input: &str) -> Result<String> {
        let code = extract_code(input)?;
        let record = self
            .auth
            .sign_in_with_code(session, &AuthorizationCode::new(code), &self.redirect_uri)
            .await
            .context("Failed to exchange authorization code")?;

        match api::get_me(&self.api, &record.access_token).await {
            Ok(me) => {
                if let Some(email) = me.email() {
                    session.set(keys::USER_EMAIL, email.to_string());
                }
                Ok(format!(
                    "Signed in as {}.",
                    me.display_name
                        .as_deref()
                        .or(me.email())
                        .unwrap_or("(unknown user)")
                ))
            }
            Err(e) => {
                tracing::warn!("Profile lookup after sign-in failed: {}", e);
                Ok("Signed in.".to_string())
            }
        }
    }

    async fn access_token(&self, session: &mut impl SessionStore) -> Result<String> {
        match self.auth.get_valid_access_token(session).await {
            Ok(token) => Ok(token),
            Err(e) if e.requires_sign_in() => {
                bail!("{}. Run 'outlook-tutorial home' to sign in.", e)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn mail(&self, session: &mut impl SessionStore) -> Result<String> {
        let token = self.access_token(session).await?;
        let anchor = session.get(keys::USER_EMAIL);
        let messages = api::list_messages(&self.api, &token, anchor.as_deref())
            .await
            .map_err(api_failure)?;
        Ok(render::messages(&messages))
    }

    pub async fn events(&self, session: &mut impl SessionStore) -> Result<String> {
        let token = self.access_token(session).await?;
        let anchor = session.get(keys::USER_EMAIL);
        let events = api::list_events(&self.api, &token, anchor.as_deref())
            .await
            .map_err(api_failure)?;
        Ok(render::events(&events))
    }

    pub async fn contacts(&self, session: &mut impl SessionStore) -> Result<String> {
        let token = self.access_token(session).await?;
        let anchor = session.get(keys::USER_EMAIL);
        let contacts = api::list_contacts(&self.api, &token, anchor.as_deref())
            .await
            .map_err(api_failure)?;
        Ok(render::contacts(&contacts))
    }

    pub async fn send(
        &self,
        session: &mut impl SessionStore,
        to: &str,
        subject: &str,
        file: &Path,
    ) -> Result<String> {
        let token = self.access_token(session).await?;
        let anchor = session.get(keys::USER_EMAIL);
        api::send_message_with_attachment(&self.api, &token, anchor.as_deref(), to, subject, file)
            .await
            .map_err(api_failure)?;
        Ok(format!("Message with {} sent to {}.", file.display(), to))
    }

    pub async fn whoami(&self, session: &mut impl SessionStore) -> Result<String> {
        let token = self.access_token(session).await?;
        let me = api::get_me(&self.api, &token).await.map_err(api_failure)?;
        Ok(format!(
            "Display Name: {}\nMail:         {}",
            me.display_name.as_deref().unwrap_or("(none)"),
            me.email().unwrap_or("(none)")
        ))
    }

    pub fn status(&self, session: &impl SessionStore) -> String {
        let state = self.auth.token_state(session);
        let mut out = format!(
            "Access token: {}",
            match state {
                TokenState::Valid => "valid",
                TokenState::Expired => "expired (will refresh on next call)",
                TokenState::NoToken => "none",
            }
        );
        if let Some(exp) = session.get(keys::TOKEN_EXPIRES) {
            out.push_str(&format!("\n  expires_at: {}", exp));
        }
        if let Some(email) = session.get(keys::USER_EMAIL) {
            out.push_str(&format!("\nUser:         {}", email));
        }
        if state == TokenState::NoToken {
            out.push_str("\n\nRun 'outlook-tutorial home' to sign in.");
        }
        out
    }
}

/// Forget tokens and user
pub fn logout(session: &mut impl SessionStore) {
    TokenRecord::clear(session);
    session.remove(keys::USER_EMAIL);
}

/// Authorization code from either the bare code or the full redirect URL.
pub fn extract_code(input: &str) -> Result<String> {
    let input = input.trim();

    if let Some(url) = Url::parse(input)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
    {
        let mut error = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" if !value.is_empty() => return Ok(value.into_owned()),
                "error_description" => error = Some(value.into_owned()),
                "error" if error.is_none() => error = Some(value.into_owned()),
                _ => {}
            }
        }
        match error {
            Some(e) => bail!("Sign-in failed: {}", e),
            None => bail!("Redirect URL has no 'code' parameter"),
        }
    }

    if input.is_empty() {
        bail!("No authorization code given");
    }
    Ok(input.to_string())
}

fn api_failure(e: Error) -> anyhow::Error {
    if e.status() == Some(401) {
        anyhow::anyhow!("{}. Run 'outlook-tutorial home' to sign in again.", e)
    } else {
        e.into()
    }
}
