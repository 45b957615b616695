//! In-memory policy repository for testing.
//!
//! Stores encoded policies keyed by path, without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::PolicyRepository, q_learning::SavedPolicy};

/// In-memory repository for testing.
///
/// All clones share the same underlying storage, so a test can hand one
/// clone to a training pipeline and inspect the checkpoints through another.
///
/// # Examples
///
/// ```
/// use mazeq::adapters::InMemoryRepository;
/// use mazeq::ports::PolicyRepository;
/// use mazeq::q_learning::{PolicyMetadata, QTable, SavedPolicy};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let policy = SavedPolicy::new(QTable::new(), 7, PolicyMetadata::default());
/// repo.save(&policy, Path::new("checkpoint"))?;
/// assert_eq!(repo.load(Path::new("checkpoint"))?.iterations, 7);
/// # Ok::<(), mazeq::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of policies currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(path.to_string_lossy().as_ref())
    }
}

impl PolicyRepository for InMemoryRepository {
    fn save(&self, policy: &SavedPolicy, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(policy).map_err(|e| Error::SerializationContext {
            operation: "serialize policy for in-memory storage".to_string(),
            message: e.to_string(),
        })?;
        self.storage()
            .insert(path.to_string_lossy().into_owned(), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedPolicy> {
        let storage = self.storage();
        let bytes = storage
            .get(path.to_string_lossy().as_ref())
            .ok_or_else(|| Error::Io {
                operation: format!("load policy from in-memory storage at {path:?}"),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "key not found in memory",
                ),
            })?;

        let policy: SavedPolicy =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize policy from in-memory storage".to_string(),
                message: e.to_string(),
            })?;
        policy.check_version()?;
        Ok(policy)
    }
}
