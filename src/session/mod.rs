//! Per-user session storage
//!
//! The authorization client only sees this key/value interface, so it works
//! the same against the in-memory store used in tests and the TOML file the
//! CLI keeps between invocations.

mod file;

#[cfg(test)]
use std::collections::BTreeMap;

pub use file::FileSession;

/// Session keys produced and consumed by the auth flow
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Epoch seconds, already reduced by the clock-skew margin
    pub const TOKEN_EXPIRES: &str = "token_expires";
    pub const USER_EMAIL: &str = "user_email";
}

/// Key/value session storage
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Session held in memory only
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}
