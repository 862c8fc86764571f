//! Inbox listing and sending mail with an attachment

use base64::Engine;
use serde_json::{json, Value};
use std::path::Path;

use super::client::{ApiClient, HttpMethod};
use super::query::{QuerySpec, SortDirection};
use super::ApiSurface;
use crate::error::{Error, Result};
use crate::models::MessageSummary;

/// Ten most recent inbox messages, newest first
pub async fn list_messages(
    client: &ApiClient,
    access_token: &str,
    anchor_mailbox: Option<&str>,
) -> Result<Vec<MessageSummary>> {
    let query = QuerySpec::new()
        .top(10)
        .select(["receivedDateTime", "subject", "from"])
        .order_by("receivedDateTime", SortDirection::Desc);

    client
        .get_collection("/me/mailfolders/inbox/messages", access_token, anchor_mailbox, &query)
        .await
}

/// `sendmail` payload carrying one base64-encoded file attachment.
pub fn attachment_message(
    surface: ApiSurface,
    recipient: &str,
    subject: &str,
    file_name: &str,
    content: &[u8],
) -> Value {
    let content_bytes = base64::engine::general_purpose::STANDARD.encode(content);
    let body_text = format!("Attached: {}", file_name);

    match surface {
        ApiSurface::Graph => json!({
            "message": {
                "subject": subject,
                "body": { "contentType": "Text", "content": body_text },
                "toRecipients": [ { "emailAddress": { "address": recipient } } ],
                "attachments": [ {
                    "@odata.type": surface.file_attachment_type(),
                    "name": file_name,
                    "contentBytes": content_bytes
                } ]
            },
            "saveToSentItems": true
        }),
        ApiSurface::Outlook => json!({
            "Message": {
                "Subject": subject,
                "Body": { "ContentType": "Text", "Content": body_text },
                "ToRecipients": [ { "EmailAddress": { "Address": recipient } } ],
                "Attachments": [ {
                    "@odata.type": surface.file_attachment_type(),
                    "Name": file_name,
                    "ContentBytes": content_bytes
                } ]
            },
            "SaveToSentItems": true
        }),
    }
}

/// Send `file_path` to `recipient` as an attachment. Only `202 Accepted`
/// counts as success.
pub async fn send_message_with_attachment(
    client: &ApiClient,
    access_token: &str,
    anchor_mailbox: Option<&str>,
    recipient: &str,
    subject: &str,
    file_path: &Path,
) -> Result<()> {
    let content = tokio::fs::read(file_path).await.map_err(|source| Error::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    tracing::debug!(
        "Sending {} ({} bytes) to {}",
        file_name,
        content.len(),
        recipient
    );

    let payload = attachment_message(client.surface(), recipient, subject, &file_name, &content);
    let resp = client
        .call(
            HttpMethod::Post,
            &client.url("/me/sendmail"),
            access_token,
            anchor_mailbox,
            Some(&payload),
            None,
        )
        .await?;

    if resp.status != 202 {
        return Err(Error::Api {
            status: resp.status,
            body: resp.body.to_string(),
        });
    }
    Ok(())
}
