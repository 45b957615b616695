//! Saved policy format and file naming

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::AgentConfig,
    q_learning::{agent::QLearningAgent, q_table::QTable},
};

/// File name prefix of saved policies.
pub const POLICY_PREFIX: &str = "policy-";

/// Extension of saved policies.
pub const POLICY_EXTENSION: &str = "msgpack";

/// Directory policies are written to when no path is given.
pub const DEFAULT_POLICY_DIR: &str = "policies";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// Episodes completed in the run that produced this save
    pub episodes_trained: Option<usize>,
    /// Timestamp when saved
    pub saved_at: Option<String>,
    /// Hyper-parameters the table was learned with
    pub agent: Option<AgentConfig>,
}

/// A value table and its iteration counter, as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicy {
    pub version: u32,
    pub q_table: QTable,
    pub iterations: u64,
    pub metadata: PolicyMetadata,
}

impl SavedPolicy {
    /// Current save format version
    pub const VERSION: u32 = 1;

    pub fn new(q_table: QTable, iterations: u64, metadata: PolicyMetadata) -> Self {
        Self {
            version: Self::VERSION,
            q_table,
            iterations,
            metadata,
        }
    }

    /// Snapshot a trained agent, stamping the save time.
    pub fn from_agent(agent: &QLearningAgent, episodes_trained: Option<usize>) -> Self {
        Self::new(
            agent.q_table().clone(),
            agent.iterations(),
            PolicyMetadata {
                episodes_trained,
                saved_at: Some(Local::now().to_rfc3339()),
                agent: Some(agent.config().clone()),
            },
        )
    }

    /// Rebuild an agent around the saved table.
    pub fn into_agent(self, config: AgentConfig) -> Result<QLearningAgent> {
        self.check_version()?;
        QLearningAgent::with_table(config, self.q_table, self.iterations)
    }

    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedPolicyVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }
        Ok(())
    }
}

/// `<directory>/policy-YY-MM-DD-HH-MM-SS-ffffff.msgpack` for the current time.
pub fn default_policy_path<P: AsRef<Path>>(directory: P) -> PathBuf {
    let stamp = Local::now().format("%y-%m-%d-%H-%M-%S-%6f");
    directory
        .as_ref()
        .join(format!("{POLICY_PREFIX}{stamp}.{POLICY_EXTENSION}"))
}

fn is_policy_name(name: &str) -> bool {
    let extension = Path::new(name).extension().and_then(|ext| ext.to_str());
    name.starts_with(POLICY_PREFIX)
        && extension.is_some_and(|ext| ext.eq_ignore_ascii_case(POLICY_EXTENSION))
}

/// Most recent saved policy in `directory`: the last file name starting with
/// the policy prefix and ending in the policy extension, compared
/// case-insensitively. Leftover temporary files from interrupted saves are
/// never candidates.
pub fn latest_policy<P: AsRef<Path>>(directory: P) -> Result<PathBuf> {
    let directory = directory.as_ref();
    let no_policy = || Error::NoSavedPolicy {
        directory: directory.to_path_buf(),
        prefix: POLICY_PREFIX.to_string(),
    };

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(no_policy()),
        Err(source) => {
            return Err(Error::Io {
                operation: format!("list directory {directory:?}"),
                source,
            });
        }
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Io {
            operation: format!("list directory {directory:?}"),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_policy_name(&name) && entry.path().is_file() {
            candidates.push((name.to_uppercase(), entry.path()));
        }
    }
    candidates.sort();
    candidates.pop().map(|(_, path)| path).ok_or_else(no_policy)
}
