//! File Cache Module
//!
//! Two-tier cache: an in-memory map in front of one compressed file per key.
//! Files outlive the process, so a new instance over the same directory sees
//! everything written by earlier ones until it expires or is invalidated.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::codec::{decode_entry, encode_entry, key_digest, CACHE_FILE_EXTENSION};
use crate::cache::expiry::DEFAULT_TTL_SECS;
use crate::cache::{CacheBackend, CacheEntry};
use crate::error::{CacheError, Result};

/// Directory name used under the system temp directory when no path is configured.
pub const DEFAULT_DIR_NAME: &str = "multicache";

/// Serializes file writes and deletions across every FileCache in the process.
static FILE_LOCK: Mutex<()> = Mutex::new(());

/// Default cache directory: `<temp_dir>/multicache`.
pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DIR_NAME)
}

// == File Cache ==
/// Durable cache mirroring every write to `<dir>/<hex-digest>.cache`.
///
/// Reads do not take the file lock, so a `get` racing a `put` or
/// `invalidate` on the same key may observe either side of it.
#[derive(Debug)]
pub struct FileCache<V> {
    /// Fast in-memory tier
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    /// Directory holding the entry files
    dir: PathBuf,
    /// Default TTL in seconds
    default_ttl: u64,
}

impl<V> FileCache<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    // == Constructor ==
    /// Opens a file cache rooted at `dir`, creating the directory if needed.
    ///
    /// A newly created directory is readable only by its owner.
    pub fn open(dir: impl Into<PathBuf>, default_ttl: u64) -> Result<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;

        Ok(Self {
            entries: Mutex::new(HashMap::new()),
            dir,
            default_ttl,
        })
    }

    /// Opens a file cache in the default temp location with the default TTL.
    pub fn open_default() -> Result<Self> {
        Self::open(default_cache_dir(), DEFAULT_TTL_SECS)
    }

    /// Directory holding the entry files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Default TTL in seconds.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    /// Location of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key_digest(key), CACHE_FILE_EXTENSION))
    }

    /// Reads the entry file for `key`. `Ok(None)` when the file does not exist.
    fn read_file(&self, key: &str) -> Result<Option<CacheEntry<V>>> {
        let path = self.path_for(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match decode_entry(&bytes) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!(path = ?path, error = %e, "Discarding corrupt cache file");
                self.invalidate(key)?;
                Err(e)
            }
        }
    }
}

impl<V> CacheBackend<V> for FileCache<V>
where
    V: Serialize + DeserializeOwned + Clone,
{
    // == Get ==
    /// Serves fresh memory hits directly, otherwise falls back to the file.
    ///
    /// A fresh file hit is returned without being copied into memory. A stale
    /// file is deleted. A corrupt file is deleted and the decode error returned.
    fn get(&self, key: &str) -> Result<Option<V>> {
        {
            let entries = self.entries.lock()?;
            if let Some(entry) = entries.get(key) {
                if !entry.is_expired() {
                    return Ok(Some(entry.value.clone()));
                }
            }
        }

        match self.read_file(key)? {
            Some(entry) if !entry.is_expired() => {
                debug!(key, "File cache hit on disk");
                // Another instance rewrote the file; the stale memory copy is obsolete
                let mut entries = self.entries.lock()?;
                if entries.get(key).is_some_and(|cached| cached.is_expired()) {
                    entries.remove(key);
                }
                Ok(Some(entry.value))
            }
            Some(_) => {
                debug!(key, "File cache entry expired");
                self.invalidate(key)?;
                Ok(None)
            }
            None => {
                // File is the durable truth; drop any stale memory copy
                self.entries.lock()?.remove(key);
                Ok(None)
            }
        }
    }

    // == Put ==
    /// Writes the file first, then the memory tier. A failed write leaves
    /// memory untouched.
    fn put_with(
        &self,
        key: &str,
        value: V,
        ex: Option<DateTime<Utc>>,
        ttl: Option<u64>,
    ) -> Result<()> {
        let entry = CacheEntry::written_now(value, ex, ttl, self.default_ttl);
        let bytes = encode_entry(&CacheEntry::new(&entry.value, entry.expires_at))?;

        let _guard = FILE_LOCK.lock()?;
        write_replace(&self.path_for(key), &bytes)?;
        self.entries.lock()?.insert(key.to_string(), entry);
        Ok(())
    }

    // == Invalidate ==
    /// Removes the memory entry and deletes the file. A missing file is fine.
    fn invalidate(&self, key: &str) -> Result<()> {
        let _guard = FILE_LOCK.lock()?;
        self.entries.lock()?.remove(key);

        remove_if_present(&self.path_for(key))
    }

    // == List Keys ==
    /// Keys held by this instance's memory tier. Files written by other
    /// instances are not listed since their names are one-way digests.
    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock()?.keys().cloned().collect())
    }

    // == Sweep Expired ==
    /// Drops stale entries from memory and deletes their files.
    ///
    /// A file is only deleted when its own contents are stale, so a newer
    /// write from another instance over the same directory survives.
    fn sweep_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let stale: Vec<String> = {
            let entries = self.entries.lock()?;
            entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect()
        };

        let _guard = FILE_LOCK.lock()?;
        let mut removed = 0;
        for key in &stale {
            {
                let mut entries = self.entries.lock()?;
                // Skip keys rewritten since the scan
                if !entries.get(key).is_some_and(|entry| entry.is_expired_at(now)) {
                    continue;
                }
                entries.remove(key);
            }
            removed += 1;

            let path = self.path_for(key);
            let file_is_stale = match fs::read(&path) {
                Ok(bytes) => decode_entry::<V>(&bytes)
                    .map(|entry| entry.is_expired_at(now))
                    .unwrap_or(true),
                Err(e) if e.kind() == io::ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            };
            if file_is_stale {
                remove_if_present(&path)?;
            }
        }

        debug!(removed, dir = ?self.dir, "Swept file cache");
        Ok(removed)
    }
}

/// Writes `bytes` beside `path` and renames over it, so readers see either
/// the previous file or the complete new one.
fn write_replace(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", std::process::id()));
    let tmp = PathBuf::from(tmp);

    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    Ok(result?)
}

/// Deletes `path`. A missing file is fine.
fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::Io(e)),
    }
}

/// Creates `dir` (and parents) if absent, owner-only on unix.
fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)?;

    info!(dir = ?dir, "Created cache directory");
    Ok(())
}
