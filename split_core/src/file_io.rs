//! # File I/O Module
//!
//! Handles ledger file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **File locking**: Prevent two people editing a shared data file at once
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Ledgers are saved as pretty-printed JSON (conventionally `data.json`).
//! Lock files sit next to them with a `.lock` suffix (`data.json.lock`) and
//! record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use split_core::file_io::{save_ledger, load_or_init, FileLock};
//! use std::path::Path;
//!
//! let path = Path::new("data.json");
//!
//! // Acquire lock before editing
//! let lock = FileLock::acquire(path, "ana@example.com").unwrap();
//!
//! let mut ledger = load_or_init(path).unwrap();
//! ledger.create_group("Flat", ["Ana", "Ben"]).unwrap();
//! save_ledger(&ledger, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{SplitError, SplitResult};
use crate::ledger::{Ledger, SCHEMA_VERSION};

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Short description of the holder, e.g. `ana (laptop)`.
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string())
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    data_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a ledger file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(SplitError::FileLocked)` - Another process holds the lock
    ///
    /// Stale locks (holder process gone, or older than a day) are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> SplitResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(SplitError::file_locked(
                        path.display().to_string(),
                        existing.holder(),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                warn!(
                    path = %path.display(),
                    holder = %existing.holder(),
                    "taking over stale lock"
                );
            }
        }

        // No truncate here: until we hold the OS lock the sidecar belongs
        // to whoever does
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                SplitError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Non-blocking: fail fast instead of hanging the UI
        if lock_file.try_lock_exclusive().is_err() {
            let (holder, since) = match read_lock_info(&lock_path) {
                Ok(existing) => (existing.holder(), existing.locked_at.to_rfc3339()),
                Err(_) => ("another process".to_string(), "unknown".to_string()),
            };
            return Err(SplitError::file_locked(path.display().to_string(), holder, since));
        }

        lock_file
            .set_len(0)
            .and_then(|_| lock_file.seek(SeekFrom::Start(0)))
            .map_err(|e| {
                SplitError::file_error("reset lock", lock_path.display().to_string(), e.to_string())
            })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(SplitError::serialization)?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            SplitError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            SplitError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        debug!(path = %path.display(), user = %info.user_id, "lock acquired");

        Ok(FileLock {
            data_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Path of the ledger file this lock protects
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        debug!(path = %self.data_path.display(), "lock released");
    }
}

/// `data.json` -> `data.json.lock`
fn lock_path_for(data_path: &Path) -> PathBuf {
    sibling_with_suffix(data_path, "lock")
}

/// `data.json` -> `data.json.tmp`
fn tmp_path_for(data_path: &Path) -> PathBuf {
    sibling_with_suffix(data_path, "tmp")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn read_lock_info(lock_path: &Path) -> SplitResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(SplitError::serialization)
}

fn read_to_string(path: &Path, operation: &str) -> SplitResult<String> {
    let mut file = File::open(path)
        .map_err(|e| SplitError::file_error(operation, path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| SplitError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// A lock is stale when its process is gone (same machine only) or it is
/// more than 24 hours old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if info.machine == hostname() {
        #[cfg(windows)]
        {
            use std::process::Command;
            let output = Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                .output();
            if let Ok(output) = output {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                    return true;
                }
            }
        }
        #[cfg(target_os = "linux")]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Save a ledger with atomic write semantics.
///
/// The save process:
/// 1. Serialize ledger to JSON
/// 2. Write to a temporary file (`<name>.tmp`)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
pub fn save_ledger(ledger: &Ledger, path: &Path) -> SplitResult<()> {
    let json = serde_json::to_string_pretty(ledger).map_err(SplitError::serialization)?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        SplitError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        SplitError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        SplitError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        SplitError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(
        path = %path.display(),
        groups = ledger.groups.len(),
        expenses = ledger.expenses.len(),
        "ledger saved"
    );
    Ok(())
}

/// Load a ledger from a file.
///
/// # Returns
///
/// * `Ok(Ledger)` - Successfully loaded ledger
/// * `Err(SplitError::VersionMismatch)` - File version is incompatible
/// * `Err(SplitError::SerializationError)` - Invalid JSON
/// * `Err(SplitError::FileError)` - I/O error
pub fn load_ledger(path: &Path) -> SplitResult<Ledger> {
    let contents = read_to_string(path, "read")?;

    let ledger: Ledger = serde_json::from_str(&contents).map_err(|e| SplitError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&ledger.meta.version)?;

    debug!(
        path = %path.display(),
        groups = ledger.groups.len(),
        expenses = ledger.expenses.len(),
        "ledger loaded"
    );
    Ok(ledger)
}

/// Load a ledger, or start an empty one if the file does not exist yet.
///
/// A file that exists but cannot be parsed is an error; it is never
/// silently replaced.
pub fn load_or_init(path: &Path) -> SplitResult<Ledger> {
    match fs::metadata(path) {
        Ok(_) => load_ledger(path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no data file yet, starting an empty ledger");
            Ok(Ledger::new())
        }
        Err(e) => Err(SplitError::file_error("stat", path.display().to_string(), e.to_string())),
    }
}

/// Load a ledger, returning whether it's read-only due to a lock.
///
/// # Returns
///
/// * `Ok((Ledger, None))` - Loaded successfully, no lock
/// * `Ok((Ledger, Some(LockInfo)))` - Loaded, but another user has the lock
/// * `Err(_)` - Failed to load
pub fn load_ledger_with_lock_check(path: &Path) -> SplitResult<(Ledger, Option<LockInfo>)> {
    let ledger = load_or_init(path)?;
    let lock_info = FileLock::check(path);
    Ok((ledger, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> SplitResult<()> {
    let mismatch = || SplitError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // On 0.x a newer minor may contain breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
