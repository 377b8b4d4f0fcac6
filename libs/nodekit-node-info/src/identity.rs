use crate::error::IdentityError;
use crate::model::NodeId;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the persisted node id inside the local state directory
pub const NODE_ID_FILE: &str = "node.id";

/// Persistence backend for the node identity.
pub trait IdentityStore: Send + Sync {
    /// Load a previously persisted id, `None` if there is none yet.
    ///
    /// # Errors
    /// Returns [`IdentityError`] if the store is unreadable or corrupt.
    fn load(&self) -> Result<Option<NodeId>, IdentityError>;

    /// Persist `id` so later loads return it.
    ///
    /// # Errors
    /// Returns [`IdentityError`] if the id cannot be written.
    fn persist(&self, id: NodeId) -> Result<(), IdentityError>;
}

/// Stores the node id as a hyphenated UUID in a single file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `<state_dir>/node.id`.
    #[must_use]
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(NODE_ID_FILE))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, e: std::io::Error) -> IdentityError {
        IdentityError::Io {
            path: self.path.clone(),
            source: Arc::new(e),
        }
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<NodeId>, IdentityError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };

        raw.parse::<NodeId>()
            .map(Some)
            .map_err(|e| IdentityError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    fn persist(&self, id: NodeId) -> Result<(), IdentityError> {
        // Write-then-rename so a crash never leaves a half-written id
        let tmp = self.path.with_extension("id.tmp");
        fs::write(&tmp, format!("{id}\n")).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }
}

/// Loads the node id, generating and persisting one on first start.
pub struct IdentityResolver {
    store: Arc<dyn IdentityStore>,
}

impl IdentityResolver {
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns [`IdentityError`] if loading fails or a new id cannot be persisted.
    pub fn resolve(&self) -> Result<NodeId, IdentityError> {
        if let Some(id) = self.store.load()? {
            tracing::debug!(node_id = %id, "Loaded persisted node id");
            return Ok(id);
        }

        let id = NodeId::generate();
        self.store.persist(id)?;
        tracing::info!(node_id = %id, "Generated new node id");
        Ok(id)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_resolve_generates_and_persists() {
        let dir = tempdir().unwrap();
        let store = FileIdentityStore::in_dir(dir.path());
        let resolver = IdentityResolver::new(Arc::new(store.clone()));

        let id = resolver.resolve().unwrap();

        assert_eq!(store.load().unwrap(), Some(id));
        assert!(!dir.path().join("node.id.tmp").exists());
    }

    #[test]
    fn test_identity_survives_restart() {
        let dir = tempdir().unwrap();
        let first = IdentityResolver::new(Arc::new(FileIdentityStore::in_dir(dir.path())))
            .resolve()
            .unwrap();
        let second = IdentityResolver::new(Arc::new(FileIdentityStore::in_dir(dir.path())))
            .resolve()
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(NODE_ID_FILE), "definitely-not-a-uuid").unwrap();

        let resolver = IdentityResolver::new(Arc::new(FileIdentityStore::in_dir(dir.path())));
        let err = resolver.resolve().unwrap_err();

        assert!(matches!(err, IdentityError::Corrupt { .. }));
        // The corrupt file must not be silently replaced
        let raw = fs::read_to_string(dir.path().join(NODE_ID_FILE)).unwrap();
        assert_eq!(raw, "definitely-not-a-uuid");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let store = FileIdentityStore::in_dir(&dir.path().join("absent"));
        let err = IdentityResolver::new(Arc::new(store)).resolve().unwrap_err();
        assert!(matches!(err, IdentityError::Io { .. }));
    }
}
