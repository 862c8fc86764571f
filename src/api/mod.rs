//! API client module for the mail, calendar and contacts REST surfaces

mod calendar;
pub mod client;
mod contacts;
mod mail;
mod me;
pub mod query;

use serde::{Deserialize, Serialize};

pub use calendar::list_events;
pub use client::ApiClient;
pub use contacts::list_contacts;
pub use mail::{list_messages, send_message_with_attachment};
pub use me::get_me;

const GRAPH_BASE: &str = "https://graph.microsoft.com/v1.0";
const OUTLOOK_BASE: &str = "https://outlook.office.com/api/v2.0";

/// Which of the two equivalent REST surfaces to talk to.
///
/// Both expose the same resources; Graph spells properties in camelCase,
/// the Outlook REST API in PascalCase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSurface {
    #[default]
    Graph,
    Outlook,
}

impl ApiSurface {
    pub fn base_url(self) -> &'static str {
        match self {
            ApiSurface::Graph => GRAPH_BASE,
            ApiSurface::Outlook => OUTLOOK_BASE,
        }
    }

    /// Property name as spelled by this surface. Accepts camelCase paths
    /// such as `start/dateTime`.
    pub fn field(self, name: &str) -> String {
        match self {
            ApiSurface::Graph => name.to_string(),
            ApiSurface::Outlook => name
                .split('/')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("/"),
        }
    }

    /// Scopes requested at sign-in when the config does not list its own
    pub fn default_scopes(self) -> &'static [&'static str] {
        match self {
            ApiSurface::Graph => &[
                "openid",
                "offline_access",
                "User.Read",
                "Mail.Read",
                "Mail.Send",
                "Calendars.Read",
                "Contacts.Read",
            ],
            ApiSurface::Outlook => &[
                "openid",
                "offline_access",
                "profile",
                "https://outlook.office.com/mail.read",
                "https://outlook.office.com/mail.send",
                "https://outlook.office.com/calendars.read",
                "https://outlook.office.com/contacts.read",
            ],
        }
    }

    /// OData type tag for a file attachment
    fn file_attachment_type(self) -> &'static str {
        match self {
            ApiSurface::Graph => "#microsoft.graph.fileAttachment",
            ApiSurface::Outlook => "#Microsoft.OutlookServices.FileAttachment",
        }
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spelling() {
        assert_eq!(ApiSurface::Graph.field("start/dateTime"), "start/dateTime");
        assert_eq!(ApiSurface::Outlook.field("start/dateTime"), "Start/DateTime");
        assert_eq!(ApiSurface::Outlook.field("givenName"), "GivenName");
    }

    #[test]
    fn test_surface_from_config_value() {
        #[derive(Deserialize)]
        struct Holder {
            surface: ApiSurface,
        }
        let h: Holder = toml::from_str("surface = \"outlook\"").unwrap();
        assert_eq!(h.surface, ApiSurface::Outlook);
    }
}
