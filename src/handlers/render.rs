//! Plain-text rendering of API results

use std::fmt::Write;

use crate::models::{ContactSummary, EventSummary, MessageSummary};

pub fn messages(messages: &[MessageSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nInbox:");
    let _ = writeln!(out, "{:-<60}", "");

    for msg in messages {
        let from = msg
            .from
            .as_ref()
            .map(|r| r.email_address.display())
            .unwrap_or_else(|| "(no sender)".to_string());
        let _ = writeln!(out, "{}  {}", msg.received_date_time, from);
        let _ = writeln!(out, "  {}", msg.subject.as_deref().unwrap_or("(no subject)"));
        let _ = writeln!(out);
    }

    if messages.is_empty() {
        let _ = writeln!(out, "  (no messages)");
    }
    out
}

pub fn events(events: &[EventSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nEvents:");
    let _ = writeln!(out, "{:-<60}", "");

    for event in events {
        let _ = writeln!(out, "{}", event.subject.as_deref().unwrap_or("(no subject)"));
        let _ = writeln!(out, "  Start: {}", event.start);
        let _ = writeln!(out, "  End:   {}", event.end);
        let _ = writeln!(out);
    }

    if events.is_empty() {
        let _ = writeln!(out, "  (no events)");
    }
    out
}

pub fn contacts(contacts: &[ContactSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nContacts:");
    let _ = writeln!(out, "{:-<60}", "");

    for contact in contacts {
        let name = contact.full_name();
        let _ = writeln!(out, "{}", if name.is_empty() { "(no name)" } else { name.as_str() });
        for addr in &contact.email_addresses {
            let _ = writeln!(out, "  {}", addr.display());
        }
        let _ = writeln!(out);
    }

    if contacts.is_empty() {
        let _ = writeln!(out, "  (no contacts)");
    }
    out
}
