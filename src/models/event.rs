//! Calendar models

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    #[serde(alias = "DateTime")]
    pub date_time: String,
    #[serde(default, alias = "TimeZone")]
    pub time_zone: Option<String>,
}

impl std::fmt::Display for DateTimeTimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.time_zone {
            Some(tz) => write!(f, "{} ({})", self.date_time, tz),
            None => f.write_str(&self.date_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventSummary {
    #[serde(alias = "Id")]
    pub id: String,
    #[serde(default, alias = "Subject")]
    pub subject: Option<String>,
    #[serde(alias = "Start")]
    pub start: DateTimeTimeZone,
    #[serde(alias = "End")]
    pub end: DateTimeTimeZone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_both_spellings() {
        let graph = r#"{
            "id": "e1", "subject": "Standup",
            "start": {"dateTime": "2024-05-01T09:00:00.0000000", "timeZone": "UTC"},
            "end": {"dateTime": "2024-05-01T09:15:00.0000000", "timeZone": "UTC"}
        }"#;
        let outlook = r#"{
            "Id": "e1", "Subject": "Standup",
            "Start": {"DateTime": "2024-05-01T09:00:00.0000000", "TimeZone": "UTC"},
            "End": {"DateTime": "2024-05-01T09:15:00.0000000", "TimeZone": "UTC"}
        }"#;
        let a: EventSummary = serde_json::from_str(graph).unwrap();
        let b: EventSummary = serde_json::from_str(outlook).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.start.to_string(), "2024-05-01T09:00:00.0000000 (UTC)");
    }

    #[test]
    fn test_event_without_start_rejected() {
        let json = r#"{"id": "e1", "end": {"dateTime": "x"}}"#;
        assert!(serde_json::from_str::<EventSummary>(json).is_err());
    }
}
