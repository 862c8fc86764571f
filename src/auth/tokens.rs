//! Token responses and the session-held token record

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::session::{keys, SessionStore};

/// Seconds subtracted from the provider-declared lifetime so a token close to
/// expiry is treated as already expired.
pub const EXPIRY_SKEW_SECS: i64 = 300;

/// Longest token lifetime accepted from the provider (one year)
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Source of the current time in epoch seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Successful answer from the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds as declared by the provider
    pub expires_in: i64,
}

#[derive(Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    expires_in: Option<i64>,
}

/// The v1 endpoint sends `expires_in` as a string, v2 as a number.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(i64),
        Text(String),
    }

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expires_in is not a number: {s:?}"))),
    }
}

impl TokenResponse {
    /// Validate a 2xx token endpoint body. Missing or empty fields are errors,
    /// never a partially filled response.
    pub fn parse(status: u16, body: &str) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedResponse {
            status,
            reason,
            body: body.to_string(),
        };

        let raw: RawTokenResponse = serde_json::from_str(body)
            .map_err(|e| malformed(format!("token response is not valid JSON: {e}")))?;

        let access_token = raw
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("token response missing 'access_token'".into()))?;
        let refresh_token = raw
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("token response missing 'refresh_token'".into()))?;
        let expires_in = raw
            .expires_in
            .ok_or_else(|| malformed("token response missing 'expires_in'".into()))?;
        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&expires_in) {
            return Err(malformed(format!(
                "token response 'expires_in' out of range: {expires_in}"
            )));
        }

        Ok(Self {
            access_token,
            refresh_token,
            expires_in,
        })
    }
}

/// Token lifecycle as seen from the session.
///
/// A failed refresh clears the record, so the terminal "invalid" state shows
/// up as `NoToken` on the next read and as an error on the refreshing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    Valid,
    Expired,
}

/// Access/refresh pair with its skew-adjusted expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Epoch seconds
    pub expires_at: i64,
}

impl TokenRecord {
    pub fn from_response(response: TokenResponse, issued_at: i64) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: issued_at
                .saturating_add(response.expires_in)
                .saturating_sub(EXPIRY_SKEW_SECS),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Read the record from a session. `Ok(None)` when no access token is stored.
    pub fn load(session: &impl SessionStore) -> Result<Option<Self>> {
        let Some(access_token) = session.get(keys::ACCESS_TOKEN) else {
            return Ok(None);
        };

        let refresh_token = session
            .get(keys::REFRESH_TOKEN)
            .ok_or_else(|| Error::InvalidSession("missing refresh_token".into()))?;
        let expires = session
            .get(keys::TOKEN_EXPIRES)
            .ok_or_else(|| Error::InvalidSession("missing token_expires".into()))?;
        let expires_at = expires.parse::<i64>().map_err(|_| {
            Error::InvalidSession(format!("token_expires is not a number: {expires:?}"))
        })?;

        Ok(Some(Self {
            access_token,
            refresh_token,
            expires_at,
        }))
    }

    pub fn store(&self, session: &mut impl SessionStore) {
        session.set(keys::ACCESS_TOKEN, self.access_token.clone());
        session.set(keys::REFRESH_TOKEN, self.refresh_token.clone());
        session.set(keys::TOKEN_EXPIRES, self.expires_at.to_string());
    }

    /// Remove every token key. The user email is kept for display.
    pub fn clear(session: &mut impl SessionStore) {
        session.remove(keys::ACCESS_TOKEN);
        session.remove(keys::REFRESH_TOKEN);
        session.remove(keys::TOKEN_EXPIRES);
    }
}
