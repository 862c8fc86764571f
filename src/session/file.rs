//! Session persisted as a flat TOML table between CLI invocations

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::SessionStore;

#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSession {
    /// Load the session at `path`, starting empty if the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let content = fs::read_to_string(&path).context("Failed to read session file")?;
            toml::from_str(&content).context("Failed to parse session file")?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the session back to disk
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("Failed to create session directory")?;
        }

        let content = toml::to_string_pretty(&self.values).context("Failed to serialize session")?;
        fs::write(&self.path, content).context("Failed to write session file")?;

        // Session holds bearer and refresh tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).context("Failed to set session permissions")?;
        }

        Ok(())
    }
}

impl SessionStore for FileSession {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::keys;

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = FileSession::load(dir.path().join("session.toml")).unwrap();
        assert!(!session.has(keys::ACCESS_TOKEN));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        let mut session = FileSession::load(&path).unwrap();
        session.set(keys::ACCESS_TOKEN, "A".into());
        session.set(keys::TOKEN_EXPIRES, "1700003300".into());
        session.save().unwrap();

        let reloaded = FileSession::load(&path).unwrap();
        assert_eq!(reloaded.get(keys::ACCESS_TOKEN).as_deref(), Some("A"));
        assert_eq!(
            reloaded.get(keys::TOKEN_EXPIRES).as_deref(),
            Some("1700003300")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        let mut session = FileSession::load(&path).unwrap();
        session.set(keys::REFRESH_TOKEN, "R".into());
        session.save().unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
