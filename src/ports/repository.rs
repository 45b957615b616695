//! Repository port for policy persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedPolicy};

/// Port for persisting and loading learned policies.
///
/// # Examples
///
/// ```no_run
/// use mazeq::ports::PolicyRepository;
/// use mazeq::q_learning::SavedPolicy;
/// use std::path::Path;
///
/// fn checkpoint<R: PolicyRepository>(
///     repo: &R,
///     policy: &SavedPolicy,
///     path: &Path,
/// ) -> mazeq::Result<()> {
///     repo.save(policy, path)
/// }
/// ```
pub trait PolicyRepository {
    /// Save a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written or serialization
    /// fails. A failed save never leaves a partially written policy behind.
    fn save(&self, policy: &SavedPolicy, path: &Path) -> Result<()>;

    /// Load a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read, is corrupted or was
    /// written by an unsupported format version.
    fn load(&self, path: &Path) -> Result<SavedPolicy>;
}
