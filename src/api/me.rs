//! User profile endpoint (/me)

use super::client::{ApiClient, HttpMethod};
use super::query::QuerySpec;
use super::ApiSurface;
use crate::error::Result;
use crate::models::UserProfile;

/// Fetch the signed-in user's display name and mailbox address.
pub async fn get_me(client: &ApiClient, access_token: &str) -> Result<UserProfile> {
    // Outlook has no `mail` property; the address lives in `EmailAddress`
    let query = match client.surface() {
        ApiSurface::Graph => QuerySpec::new().select(["displayName", "mail", "userPrincipalName"]),
        ApiSurface::Outlook => QuerySpec::new().select(["displayName", "emailAddress"]),
    };

    client
        .call(
            HttpMethod::Get,
            &client.url("/me"),
            access_token,
            None,
            None,
            Some(&query),
        )
        .await?
        .into_entity()
}
