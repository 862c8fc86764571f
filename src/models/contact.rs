//! Contact models

use serde::Deserialize;

use super::EmailAddress;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(default, alias = "GivenName")]
    pub given_name: Option<String>,
    #[serde(default, alias = "Surname")]
    pub surname: Option<String>,
    #[serde(default, alias = "EmailAddresses")]
    pub email_addresses: Vec<EmailAddress>,
}

impl ContactSummary {
    pub fn full_name(&self) -> String {
        [self.given_name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_full_name_and_addresses() {
        let json = r#"{
            "Id": "c1", "GivenName": "Grace", "Surname": "Hopper",
            "EmailAddresses": [{"Name": "Grace", "Address": "grace@example.com"}]
        }"#;
        let c: ContactSummary = serde_json::from_str(json).unwrap();
        assert_eq!(c.full_name(), "Grace Hopper");
        assert_eq!(
            c.email_addresses[0].address.as_deref(),
            Some("grace@example.com")
        );
    }

    #[test]
    fn test_contact_without_addresses() {
        let c: ContactSummary =
            serde_json::from_str(r#"{"id": "c2", "givenName": "Ada"}"#).unwrap();
        assert_eq!(c.full_name(), "Ada");
        assert!(c.email_addresses.is_empty());
    }
}
