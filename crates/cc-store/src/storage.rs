//! Client-local key-value storage backends.

use cc_core::{ConsentError, is_valid_storage_key};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".storage.lock";

/// Synchronous string key-value storage (the `localStorage` contract).
///
/// `get` returns `Ok(None)` for a missing key; any other failure is
/// [`ConsentError::StorageUnavailable`].
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsentError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ConsentError>;
}

/// In-memory storage. Failure injection lets callers exercise the
/// quota/permission paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Make every `get` fail, as a browser with storage disabled does.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Make every `set` fail, as a full quota does.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsentError> {
        if self.fail_reads {
            return Err(ConsentError::storage("read", "storage access denied"));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConsentError> {
        if self.fail_writes {
            return Err(ConsentError::storage("write", "quota exceeded"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// File-backed storage: one `{key}.json` file per key inside a profile
/// directory. Writes are serialized with an advisory lock and land
/// atomically via temp-file + rename.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn check_key(op: &'static str, key: &str) -> Result<(), ConsentError> {
    if is_valid_storage_key(key) {
        Ok(())
    } else {
        Err(ConsentError::storage(op, format!("invalid storage key '{key}'")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, ConsentError> {
        check_key("read", key)?;
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConsentError::storage(
                "read",
                format!("{}: {e}", path.display()),
            )),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConsentError> {
        check_key("write", key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            ConsentError::storage("write", format!("{}: {e}", self.dir.display()))
        })?;

        let lock_path = self.dir.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| ConsentError::storage("write", format!("{}: {e}", lock_path.display())))?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock
            .write()
            .map_err(|e| ConsentError::storage("write", format!("lock failed: {e}")))?;

        atomic_write(&self.path_for(key), value.as_bytes())
    }
}

/// Write data to a file atomically using temp-file + rename.
fn atomic_write(target: &Path, data: &[u8]) -> Result<(), ConsentError> {
    let parent = target
        .parent()
        .ok_or_else(|| ConsentError::storage("write", "target path has no parent"))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
        ConsentError::storage("write", format!("temp file in {}: {e}", parent.display()))
    })?;
    tmp.write_all(data)
        .map_err(|e| ConsentError::storage("write", format!("temp file write: {e}")))?;
    tmp.persist(target).map_err(|e| {
        ConsentError::storage("write", format!("persist {}: {}", target.display(), e.error))
    })?;
    Ok(())
}
