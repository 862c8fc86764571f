//! Calendar events

use super::client::ApiClient;
use super::query::{QuerySpec, SortDirection};
use crate::error::Result;
use crate::models::EventSummary;

/// First ten events ordered by start time
pub async fn list_events(
    client: &ApiClient,
    access_token: &str,
    anchor_mailbox: Option<&str>,
) -> Result<Vec<EventSummary>> {
    let query = QuerySpec::new()
        .top(10)
        .select(["subject", "start", "end"])
        .order_by("start/dateTime", SortDirection::Asc);

    client
        .get_collection("/me/events", access_token, anchor_mailbox, &query)
        .await
}
