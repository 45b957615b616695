//! MessagePack implementation of the policy repository.
//!
//! Writes go to a temporary sibling file that is renamed over the
//! destination once fully flushed, so readers only ever see a complete
//! policy.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Result, error::Error, ports::PolicyRepository, q_learning::SavedPolicy};

/// MessagePack-based policy repository.
///
/// # Examples
///
/// ```no_run
/// use mazeq::adapters::MsgPackRepository;
/// use mazeq::ports::PolicyRepository;
/// use mazeq::q_learning::{PolicyMetadata, QTable, SavedPolicy};
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let policy = SavedPolicy::new(QTable::new(), 0, PolicyMetadata::default());
/// repo.save(&policy, Path::new("policies/policy.msgpack"))?;
/// let loaded = repo.load(Path::new("policies/policy.msgpack"))?;
/// # Ok::<(), mazeq::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

/// Hidden `.<name>.tmp` sibling, outside the policy naming convention.
fn temporary_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_policy(policy: &SavedPolicy, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create file {path:?}"),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    rmp_serde::encode::write(&mut writer, policy).map_err(|e| Error::SerializationContext {
        operation: "serialize policy to MessagePack".to_string(),
        message: e.to_string(),
    })?;

    let file = writer.into_inner().map_err(|e| Error::Io {
        operation: format!("flush file {path:?}"),
        source: e.into_error(),
    })?;
    file.sync_all().map_err(|source| Error::Io {
        operation: format!("sync file {path:?}"),
        source,
    })
}

impl PolicyRepository for MsgPackRepository {
    fn save(&self, policy: &SavedPolicy, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let temporary = temporary_path(path);
        if let Err(err) = write_policy(policy, &temporary) {
            let _ = fs::remove_file(&temporary);
            return Err(err);
        }
        fs::rename(&temporary, path).map_err(|source| {
            let _ = fs::remove_file(&temporary);
            Error::Io {
                operation: format!("rename {temporary:?} to {path:?}"),
                source,
            }
        })?;

        debug!(path = %path.display(), entries = policy.q_table.len(), "policy saved");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedPolicy> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let policy: SavedPolicy = rmp_serde::decode::from_read(BufReader::new(file)).map_err(
            |e| Error::SerializationContext {
                operation: "deserialize policy from MessagePack".to_string(),
                message: e.to_string(),
            },
        )?;
        policy.check_version()?;

        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::q_learning::{PolicyMetadata, QTable};

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("nested").join("policy.msgpack");

        let repo = MsgPackRepository::new();
        let policy = SavedPolicy::new(QTable::new(), 300, PolicyMetadata::default());

        repo.save(&policy, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert!(loaded.q_table.is_empty());
        assert_eq!(loaded.iterations, 300);
        assert!(!temporary_path(&file_path).exists());
    }

    #[test]
    fn test_temporary_file_is_hidden() {
        let temporary = temporary_path(Path::new("policies/policy-1.msgpack"));
        assert_eq!(temporary, PathBuf::from("policies/.policy-1.msgpack.tmp"));
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("policy.msgpack");
        fs::write(&file_path, b"stale").unwrap();

        let repo = MsgPackRepository::new();
        let policy = SavedPolicy::new(QTable::new(), 1, PolicyMetadata::default());
        repo.save(&policy, &file_path).expect("Failed to save");
        assert_eq!(repo.load(&file_path).unwrap().iterations, 1);
    }

    #[test]
    fn test_corrupted_file_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("policy.msgpack");
        fs::write(&file_path, b"not a policy").unwrap();

        let err = MsgPackRepository::new().load(&file_path).unwrap_err();
        assert!(matches!(err, Error::SerializationContext { .. }));
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.load(Path::new("/tmp/nonexistent_mazeq_12345.msgpack"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
