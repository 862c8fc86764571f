//! Mail models

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
    #[serde(alias = "Name")]
    pub name: Option<String>,
    #[serde(alias = "Address")]
    pub address: Option<String>,
}

impl EmailAddress {
    /// `Name <address>`, or whichever half is present
    pub fn display(&self) -> String {
        match (self.name.as_deref(), self.address.as_deref()) {
            (Some(name), Some(addr)) if !name.is_empty() => format!("{} <{}>", name, addr),
            (_, Some(addr)) => addr.to_string(),
            (Some(name), None) => name.to_string(),
            (None, None) => "(unknown)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Recipient {
    #[serde(rename = "emailAddress", alias = "EmailAddress")]
    pub email_address: EmailAddress,
}

/// Inbox row: sender, subject and receive time
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(alias = "ReceivedDateTime")]
    pub received_date_time: String,
    #[serde(default, alias = "Subject")]
    pub subject: Option<String>,
    #[serde(default, alias = "From")]
    pub from: Option<Recipient>,
}
