//! Filesystem bookkeeping for staged, committed, and soft-deleted files.
//!
//! Physical layout under the attachment root:
//!
//! ```text
//! <issue-id>/<stored-name>            active files
//! _deleted/<issue-id>/<stored-name>   soft-deleted payloads
//! _staging/<token>/<stored-name>      files staged for unsaved issues
//! ```
//!
//! All operations are blocking, self-contained units; callers on an event
//! loop should move them off the hot thread. Mutual exclusion across
//! processes is delegated to the filesystem share; concurrent writers on
//! the same issue folder resolve name collisions last-writer-wins.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::access::domain::IssueId;
use crate::attachment::domain::{
    AttachmentError, AttachmentRecord, ContainerKey, StagingToken, naming,
};

const DELETED_DIR: &str = "_deleted";
const STAGING_DIR: &str = "_staging";

/// Configured ceilings for one container.
///
/// Policy is external; the manager enforces whatever it is configured
/// with. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityLimits {
    max_files: Option<usize>,
    max_total_bytes: Option<u64>,
}

impl CapacityLimits {
    /// No ceilings.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_files: None,
            max_total_bytes: None,
        }
    }

    /// Caps the number of active files per container.
    #[must_use]
    pub const fn with_max_files(mut self, max: usize) -> Self {
        self.max_files = Some(max);
        self
    }

    /// Caps the total active payload bytes per container.
    #[must_use]
    pub const fn with_max_total_bytes(mut self, max: u64) -> Self {
        self.max_total_bytes = Some(max);
        self
    }
}

/// Manages the attachment directory tree for one register.
///
/// The manager is permission-agnostic bookkeeping: callers obtain an allow
/// decision from the access control engine before invoking it. An
/// in-process index preserves insertion order per container; containers
/// first touched after a restart are reloaded from disk in name order.
#[derive(Debug)]
pub struct AttachmentManager {
    root: Dir,
    limits: CapacityLimits,
    index: RwLock<HashMap<ContainerKey, Vec<AttachmentRecord>>>,
}

impl AttachmentManager {
    /// Opens (creating if necessary) the attachment root at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::IoFailure`] when the root cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path, limits: CapacityLimits) -> Result<Self, AttachmentError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(|err| AttachmentError::io(format!("creating attachment root {path}"), err))?;
        let root = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(|err| AttachmentError::io(format!("opening attachment root {path}"), err))?;
        Ok(Self::from_dir(root, limits))
    }

    /// Wraps an already-opened attachment root.
    #[must_use]
    pub fn from_dir(root: Dir, limits: CapacityLimits) -> Self {
        Self {
            root,
            limits,
            index: RwLock::new(HashMap::new()),
        }
    }

    /// Allocates a fresh staging token with an empty staged set.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::IoFailure`] when the staging folder
    /// cannot be created.
    pub fn begin_staging(&self) -> Result<StagingToken, AttachmentError> {
        let token = StagingToken::new();
        let key = ContainerKey::Staging(token);
        self.root
            .create_dir_all(Self::active_path(key))
            .map_err(|err| AttachmentError::io(format!("creating staging folder {token}"), err))?;
        self.with_index(|index| {
            index.insert(key, Vec::new());
        })?;
        Ok(token)
    }

    /// Copies `source` into the container, returning the stored name.
    ///
    /// Name collisions against the container's active set are resolved with
    /// a numeric disambiguator. Configured ceilings are enforced before any
    /// bytes move.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::CapacityExceeded`] when a ceiling would
    /// be exceeded and [`AttachmentError::IoFailure`] when the source is
    /// unreadable or the destination unwritable.
    pub fn add_file(
        &self,
        container: ContainerKey,
        source: &Utf8Path,
    ) -> Result<String, AttachmentError> {
        let (source_dir, source_name) = open_source(source)?;
        let source_len = source_dir
            .metadata(source_name)
            .map_err(|err| AttachmentError::io(format!("reading source {source}"), err))?
            .len();

        let records = self.load_container(container)?;
        self.enforce_limits(container, &records, source_len)?;

        let target_dir = self.open_container_dir(container, true)?;
        let desired = naming::sanitize_file_name(source_name);
        let stored = naming::disambiguate(&desired, |candidate| {
            records
                .iter()
                .any(|record| record.is_active() && record.stored_name() == candidate)
                || target_dir.try_exists(candidate).unwrap_or(false)
        })?;

        source_dir
            .copy(source_name, &target_dir, &stored)
            .map_err(|err| AttachmentError::io(format!("copying {source} into {container}"), err))?;
        tracing::debug!(%container, stored, "attachment added");

        self.with_index(|index| {
            index
                .entry(container)
                .or_default()
                .push(AttachmentRecord::active(stored.clone()));
        })?;
        Ok(stored)
    }

    /// Relocates every staged file into the issue's active set, preserving
    /// names where possible, and discards the token.
    ///
    /// All-or-nothing from the caller's perspective: on the first failed
    /// relocation the manager stops, reports which files succeeded, and
    /// performs no rollback (the underlying storage has no transaction
    /// primitive). Each completed move is logged for external cleanup, and
    /// the staged set is reloaded from disk on the next attempt, so a retry
    /// moves only the files that remain.
    ///
    /// Committing an unknown or already-committed token is a no-op yielding
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::PartialCommitFailure`] naming the files
    /// relocated before the failure, or [`AttachmentError::IoFailure`] when
    /// the issue folder cannot be prepared.
    pub fn commit(
        &self,
        token: StagingToken,
        issue: IssueId,
    ) -> Result<Vec<String>, AttachmentError> {
        let staging_key = ContainerKey::Staging(token);
        let staged = self.load_container(staging_key)?;
        if staged.is_empty() {
            self.discard_staging(token)?;
            return Ok(Vec::new());
        }

        let issue_key = ContainerKey::Issue(issue);
        let issue_records = self.load_container(issue_key)?;
        let staging_dir = self.open_container_dir(staging_key, false)?;
        let issue_dir = self.open_container_dir(issue_key, true)?;

        let mut committed: Vec<String> = Vec::with_capacity(staged.len());
        for record in &staged {
            let target = naming::disambiguate(record.stored_name(), |candidate| {
                issue_records
                    .iter()
                    .any(|existing| existing.is_active() && existing.stored_name() == candidate)
                    || committed.iter().any(|name| name == candidate)
                    || issue_dir.try_exists(candidate).unwrap_or(false)
            })?;
            if let Err(err) = staging_dir.rename(record.stored_name(), &issue_dir, &target) {
                tracing::warn!(
                    %token,
                    %issue,
                    completed = ?committed,
                    failed = record.stored_name(),
                    "commit interrupted; relocated files are not rolled back"
                );
                self.append_committed(issue_key, &committed)?;
                // Relocated files are gone from the staging folder; dropping
                // the stale entry makes a retry rebuild the remaining set
                // from disk instead of replaying moved names.
                self.with_index(|index| {
                    index.remove(&staging_key);
                })?;
                return Err(AttachmentError::PartialCommitFailure {
                    succeeded: committed,
                    source: err,
                });
            }
            tracing::debug!(%token, %issue, name = %target, "staged file committed");
            committed.push(target);
        }

        self.append_committed(issue_key, &committed)?;
        self.discard_staging(token)?;
        Ok(committed)
    }

    /// Deletes every staged file and discards the token.
    ///
    /// Idempotent: abandoning an unknown or already-discarded token does
    /// nothing and does not error.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::IoFailure`] when the staging folder
    /// exists but cannot be removed.
    pub fn abandon(&self, token: StagingToken) -> Result<(), AttachmentError> {
        self.discard_staging(token)
    }

    /// Soft-deletes an active file: the payload moves to the deleted area
    /// and the record flips to the deleted state in place.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::NotFound`] for an unknown name,
    /// [`AttachmentError::AlreadyDeleted`] for a file already soft-deleted,
    /// or [`AttachmentError::IoFailure`] when the move fails.
    pub fn remove_file(&self, issue: IssueId, stored_name: &str) -> Result<(), AttachmentError> {
        let key = ContainerKey::Issue(issue);
        let records = self.load_container(key)?;
        Self::find_active(&records, stored_name)?;

        let deleted_path = Utf8PathBuf::from(DELETED_DIR).join(issue.to_string());
        self.root
            .create_dir_all(&deleted_path)
            .map_err(|err| AttachmentError::io("creating deleted folder", err))?;
        let deleted_dir = self
            .root
            .open_dir(&deleted_path)
            .map_err(|err| AttachmentError::io("opening deleted folder", err))?;
        let issue_dir = self.open_container_dir(key, false)?;

        let target = naming::disambiguate(stored_name, |candidate| {
            deleted_dir.try_exists(candidate).unwrap_or(false)
        })?;
        issue_dir
            .rename(stored_name, &deleted_dir, &target)
            .map_err(|err| {
                AttachmentError::io(format!("soft-deleting {stored_name} from issue {issue}"), err)
            })?;
        tracing::debug!(%issue, stored_name, "attachment soft-deleted");

        self.with_index(|index| {
            if let Some(entries) = index.get_mut(&key)
                && let Some(entry) = entries
                    .iter_mut()
                    .find(|entry| entry.is_active() && entry.stored_name() == stored_name)
            {
                entry.mark_deleted();
            }
        })
    }

    /// Duplicates an active file into `export_root` for an external opener,
    /// returning the path of the copy. The stored payload is never mutated.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::NotFound`] for an unknown name,
    /// [`AttachmentError::AlreadyDeleted`] for a soft-deleted file, or
    /// [`AttachmentError::IoFailure`] when the copy fails.
    pub fn open_file(
        &self,
        issue: IssueId,
        stored_name: &str,
        export_root: &Utf8Path,
    ) -> Result<Utf8PathBuf, AttachmentError> {
        let key = ContainerKey::Issue(issue);
        let records = self.load_container(key)?;
        Self::find_active(&records, stored_name)?;

        Dir::create_ambient_dir_all(export_root, ambient_authority())
            .map_err(|err| AttachmentError::io(format!("creating export folder {export_root}"), err))?;
        let export_dir = Dir::open_ambient_dir(export_root, ambient_authority())
            .map_err(|err| AttachmentError::io(format!("opening export folder {export_root}"), err))?;
        let issue_dir = self.open_container_dir(key, false)?;

        let target = naming::disambiguate(stored_name, |candidate| {
            export_dir.try_exists(candidate).unwrap_or(false)
        })?;
        issue_dir
            .copy(stored_name, &export_dir, &target)
            .map_err(|err| {
                AttachmentError::io(format!("exporting {stored_name} from issue {issue}"), err)
            })?;
        Ok(export_root.join(target))
    }

    /// Lists the container's records with their states, in insertion order.
    ///
    /// Soft-deleted files stay listed; an emptied container remains a valid
    /// (empty) listing.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::IoFailure`] when a reload from disk
    /// fails.
    pub fn list_files(&self, container: ContainerKey) -> Result<Vec<AttachmentRecord>, AttachmentError> {
        self.load_container(container)
    }

    /// Resolves `stored_name` to its active record.
    ///
    /// A name can appear twice when a file is re-added after a soft delete;
    /// the active record wins, and a name with only deleted records reports
    /// `AlreadyDeleted`.
    fn find_active<'a>(
        records: &'a [AttachmentRecord],
        stored_name: &str,
    ) -> Result<&'a AttachmentRecord, AttachmentError> {
        if let Some(record) = records
            .iter()
            .find(|record| record.is_active() && record.stored_name() == stored_name)
        {
            return Ok(record);
        }
        if records
            .iter()
            .any(|record| record.stored_name() == stored_name)
        {
            Err(AttachmentError::AlreadyDeleted(stored_name.to_owned()))
        } else {
            Err(AttachmentError::NotFound(stored_name.to_owned()))
        }
    }

    /// Relative path of a container's active area.
    fn active_path(container: ContainerKey) -> Utf8PathBuf {
        match container {
            ContainerKey::Staging(token) => Utf8PathBuf::from(STAGING_DIR).join(token.to_string()),
            ContainerKey::Issue(id) => Utf8PathBuf::from(id.to_string()),
        }
    }

    /// Opens a container's active directory, optionally creating it.
    fn open_container_dir(
        &self,
        container: ContainerKey,
        create: bool,
    ) -> Result<Dir, AttachmentError> {
        let path = Self::active_path(container);
        if create {
            self.root
                .create_dir_all(&path)
                .map_err(|err| AttachmentError::io(format!("creating folder for {container}"), err))?;
        }
        self.root
            .open_dir(&path)
            .map_err(|err| AttachmentError::io(format!("opening folder for {container}"), err))
    }

    /// Returns the container's records, reloading from disk on first touch.
    fn load_container(
        &self,
        container: ContainerKey,
    ) -> Result<Vec<AttachmentRecord>, AttachmentError> {
        {
            let index = self
                .index
                .read()
                .map_err(|_| AttachmentError::io("locking index", poisoned()))?;
            if let Some(records) = index.get(&container) {
                return Ok(records.clone());
            }
        }

        // First touch since process start: rebuild from the directory tree.
        // Insertion order is unknown, so name order stands in for it.
        let mut records: Vec<AttachmentRecord> = self
            .scan_names(&Self::active_path(container))?
            .into_iter()
            .map(AttachmentRecord::active)
            .collect();
        if let ContainerKey::Issue(id) = container {
            let deleted_path = Utf8PathBuf::from(DELETED_DIR).join(id.to_string());
            records.extend(
                self.scan_names(&deleted_path)?
                    .into_iter()
                    .map(AttachmentRecord::deleted),
            );
        }

        self.with_index(|index| {
            index.entry(container).or_insert_with(|| records.clone());
        })?;
        Ok(records)
    }

    /// Lists regular file names under `path`, sorted; a missing directory
    /// yields an empty list.
    fn scan_names(&self, path: &Utf8Path) -> Result<Vec<String>, AttachmentError> {
        let dir = match self.root.open_dir(path) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(AttachmentError::io(format!("opening {path}"), err)),
        };
        let mut names = Vec::new();
        let entries = dir
            .entries()
            .map_err(|err| AttachmentError::io(format!("listing {path}"), err))?;
        for entry in entries {
            let entry = entry.map_err(|err| AttachmentError::io(format!("listing {path}"), err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| AttachmentError::io(format!("inspecting {path}"), err))?;
            if file_type.is_file() {
                let name = entry
                    .file_name()
                    .map_err(|err| AttachmentError::io(format!("decoding name in {path}"), err))?;
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Applies configured ceilings before a new payload of `incoming_len`
    /// bytes enters the container.
    fn enforce_limits(
        &self,
        container: ContainerKey,
        records: &[AttachmentRecord],
        incoming_len: u64,
    ) -> Result<(), AttachmentError> {
        let active: Vec<&AttachmentRecord> =
            records.iter().filter(|record| record.is_active()).collect();
        if let Some(max_files) = self.limits.max_files
            && active.len() >= max_files
        {
            return Err(AttachmentError::CapacityExceeded(format!(
                "{container} already holds {max_files} file(s)"
            )));
        }
        if let Some(max_bytes) = self.limits.max_total_bytes {
            let dir = self.open_container_dir(container, true)?;
            let mut total = incoming_len;
            for record in active {
                total += dir
                    .metadata(record.stored_name())
                    .map(|metadata| metadata.len())
                    .unwrap_or(0);
            }
            if total > max_bytes {
                return Err(AttachmentError::CapacityExceeded(format!(
                    "{container} would exceed {max_bytes} byte(s)"
                )));
            }
        }
        Ok(())
    }

    /// Appends freshly committed names to the issue container's index.
    fn append_committed(
        &self,
        issue_key: ContainerKey,
        committed: &[String],
    ) -> Result<(), AttachmentError> {
        self.with_index(|index| {
            let entries = index.entry(issue_key).or_default();
            entries.extend(
                committed
                    .iter()
                    .cloned()
                    .map(AttachmentRecord::active),
            );
        })
    }

    /// Removes a staging folder and its index entry, tolerating absence.
    fn discard_staging(&self, token: StagingToken) -> Result<(), AttachmentError> {
        let key = ContainerKey::Staging(token);
        self.with_index(|index| {
            index.remove(&key);
        })?;
        match self.root.remove_dir_all(Self::active_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AttachmentError::io(
                format!("discarding staging folder {token}"),
                err,
            )),
        }
    }

    /// Runs a closure under the index write lock.
    fn with_index<T>(
        &self,
        apply: impl FnOnce(&mut HashMap<ContainerKey, Vec<AttachmentRecord>>) -> T,
    ) -> Result<T, AttachmentError> {
        let mut index = self
            .index
            .write()
            .map_err(|_| AttachmentError::io("locking index", poisoned()))?;
        Ok(apply(&mut index))
    }
}

/// Opens the parent directory of an ambient source path.
fn open_source(path: &Utf8Path) -> Result<(Dir, &str), AttachmentError> {
    let file_name = path.file_name().ok_or_else(|| {
        AttachmentError::io(
            format!("resolving source {path}"),
            std::io::Error::other("path must include a file name"),
        )
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| AttachmentError::io(format!("opening source folder {parent}"), err))?;
    Ok((dir, file_name))
}

fn poisoned() -> std::io::Error {
    std::io::Error::other("attachment index lock poisoned")
}
