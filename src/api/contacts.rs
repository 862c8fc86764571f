//! Personal contacts

use super::client::ApiClient;
use super::query::{QuerySpec, SortDirection};
use crate::error::Result;
use crate::models::ContactSummary;

/// First ten contacts ordered by given name
pub async fn list_contacts(
    client: &ApiClient,
    access_token: &str,
    anchor_mailbox: Option<&str>,
) -> Result<Vec<ContactSummary>> {
    let query = QuerySpec::new()
        .top(10)
        .select(["givenName", "surname", "emailAddresses"])
        .order_by("givenName", SortDirection::Asc);

    client
        .get_collection("/me/contacts", access_token, anchor_mailbox, &query)
        .await
}
