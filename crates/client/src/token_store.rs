//! Where portal tokens live between runs.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use ems_types::Portal;

use crate::error::ClientResult;

pub trait TokenStore: Send + Sync {
    fn get(&self, portal: Portal) -> ClientResult<Option<String>>;
    fn set(&self, portal: Portal, token: &str) -> ClientResult<()>;
    fn remove(&self, portal: Portal) -> ClientResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<Portal, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokens(&self) -> std::sync::MutexGuard<'_, HashMap<Portal, String>> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, portal: Portal) -> ClientResult<Option<String>> {
        Ok(self.tokens().get(&portal).cloned())
    }

    fn set(&self, portal: Portal, token: &str) -> ClientResult<()> {
        self.tokens().insert(portal, token.to_string());
        Ok(())
    }

    fn remove(&self, portal: Portal) -> ClientResult<()> {
        self.tokens().remove(&portal);
        Ok(())
    }
}

/// JSON object keyed by `HRtoken` / `EMtoken`. The file and its parent
/// directories are created on first write.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> ClientResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, tokens: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(tokens)?)?;
        Ok(())
    }

    fn update<F>(&self, change: F) -> ClientResult<()>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut tokens = self.read()?;
        change(&mut tokens);
        self.write(&tokens)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, portal: Portal) -> ClientResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.read()?.remove(portal.token_key()))
    }

    fn set(&self, portal: Portal, token: &str) -> ClientResult<()> {
        self.update(|tokens| {
            tokens.insert(portal.token_key().to_string(), token.to_string());
        })
    }

    fn remove(&self, portal: Portal) -> ClientResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|tokens| {
            tokens.remove(portal.token_key());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_keeps_portals_apart() {
        let store = MemoryTokenStore::new();
        store.set(Portal::Hr, "hr-token").unwrap();
        assert_eq!(store.get(Portal::Hr).unwrap().as_deref(), Some("hr-token"));
        assert_eq!(store.get(Portal::Employee).unwrap(), None);
        store.remove(Portal::Hr).unwrap();
        assert_eq!(store.get(Portal::Hr).unwrap(), None);
    }

    #[test]
    fn file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");
        let store = FileTokenStore::new(&path);
        assert_eq!(store.get(Portal::Employee).unwrap(), None);

        store.set(Portal::Employee, "em-token").unwrap();
        store.set(Portal::Hr, "hr-token").unwrap();
        let raw: HashMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["EMtoken"], "em-token");
        assert_eq!(raw["HRtoken"], "hr-token");

        let reopened = FileTokenStore::new(&path);
        reopened.remove(Portal::Hr).unwrap();
        assert_eq!(reopened.get(Portal::Hr).unwrap(), None);
        assert_eq!(reopened.get(Portal::Employee).unwrap().as_deref(), Some("em-token"));
    }

    #[test]
    fn removing_from_a_missing_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("absent.json"));
        store.remove(Portal::Hr).unwrap();
        assert!(!store.path().exists());
    }
}
