//! YAML document store with caching and atomic updates
//!
//! [`ConfigStore`] owns a config root directory and serves parsed YAML
//! documents out of an in-memory cache keyed by resolved path. A cache
//! entry stays valid while its recorded modification time is >= the
//! file's current mtime on disk; when the file changes underneath us the
//! next load re-reads and re-parses.
//!
//! Updates never write in place. The merged document is serialized to a
//! temp file in the same directory and renamed over the original, so a
//! concurrent reader sees either the fully-old or fully-new content. A
//! timestamped backup taken before the write is restored on any failure
//! and deleted on success. Two racing writers are still last-writer-wins;
//! the store targets one writer process per config root.
//!
//! The cache is owned by the store instance (no process-wide state) and
//! unsynchronized: `RefCell` keeps the store single-threaded by
//! construction, matching its intended request-response use.

use crate::config::schema::{Schema, Violation};
use serde_yaml::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// A parsed configuration document
pub type Document = Value;

/// Errors raised by the document store
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{} failed schema validation:{}", .path.display(), format_violations(.violations))]
    Validation {
        path: PathBuf,
        violations: Vec<Violation>,
    },

    #[error("no {kind} record with id `{id}`")]
    RecordNotFound { kind: String, id: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn format_violations(violations: &[Violation]) -> String {
    let mut out = String::new();
    for violation in violations {
        out.push_str("\n  - ");
        out.push_str(&violation.to_string());
    }
    out
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Wall-clock source for backup and temp-file naming; injectable so
/// tests produce deterministic file names.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// The real wall clock
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Source of file modification timestamps; injectable so cache
/// invalidation can be driven deterministically in tests.
pub trait MtimeSource {
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Modification times straight from filesystem metadata
#[derive(Debug, Default)]
pub struct FsMtime;

impl MtimeSource for FsMtime {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }
}

/// One cached document: parsed content plus the mtime observed at load
struct CacheEntry {
    content: Document,
    modified: SystemTime,
}

/// In-memory document cache keyed by resolved absolute path
#[derive(Default)]
struct DocumentCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DocumentCache {
    /// A cached entry is served only while its recorded mtime is >= the
    /// file's current mtime, i.e. the file has not changed since caching.
    fn get_valid(&self, path: &Path, current: SystemTime) -> Option<&Document> {
        self.entries
            .get(path)
            .filter(|entry| entry.modified >= current)
            .map(|entry| &entry.content)
    }

    fn insert(&mut self, path: PathBuf, content: Document, modified: SystemTime) {
        self.entries.insert(path, CacheEntry { content, modified });
    }

    fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Options controlling [`ConfigStore::update_with`]
pub struct UpdateOptions<'a> {
    /// Validate the merged document against this schema before writing
    pub schema: Option<&'a Schema>,
    /// Copy the original aside before writing; the copy is restored on
    /// failure and removed on success
    pub backup: bool,
}

impl Default for UpdateOptions<'_> {
    fn default() -> Self {
        Self {
            schema: None,
            backup: true,
        }
    }
}

/// YAML-backed configuration store for one config root directory
pub struct ConfigStore {
    root: PathBuf,
    cache: RefCell<DocumentCache>,
    clock: Box<dyn Clock>,
    mtimes: Box<dyn MtimeSource>,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("root", &self.root)
            .field("cached_documents", &self.cache.borrow().len())
            .finish()
    }
}

impl ConfigStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_sources(root, Box::new(SystemClock), Box::new(FsMtime))
    }

    /// Construct with explicit clock and mtime sources (used by tests to
    /// drive cache invalidation and backup naming deterministically).
    pub fn with_sources(
        root: impl Into<PathBuf>,
        clock: Box<dyn Clock>,
        mtimes: Box<dyn MtimeSource>,
    ) -> Self {
        Self {
            root: root.into(),
            cache: RefCell::new(DocumentCache::default()),
            clock,
            mtimes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a document path against the config root.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Load a document through the cache, without schema validation.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document> {
        self.load_with(path, None, true)
    }

    /// Load a document with optional schema validation and cache control.
    ///
    /// Validation failure aborts the load with every violation found; no
    /// partially-validated document is ever returned or cached.
    pub fn load_with(
        &self,
        path: impl AsRef<Path>,
        schema: Option<&Schema>,
        use_cache: bool,
    ) -> Result<Document> {
        let resolved = self.resolve(path.as_ref());
        if !resolved.exists() {
            return Err(ConfigError::NotFound { path: resolved });
        }

        let modified = self.mtimes.modified(&resolved)?;
        if use_cache {
            if let Some(content) = self.cache.borrow().get_valid(&resolved, modified) {
                debug!("cache hit: {}", resolved.display());
                return Ok(content.clone());
            }
        }

        debug!("loading {}", resolved.display());
        let raw = fs::read_to_string(&resolved)?;
        let content: Document = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: resolved.clone(),
            source,
        })?;

        if let Some(schema) = schema {
            let violations = schema.validate(&content);
            if !violations.is_empty() {
                return Err(ConfigError::Validation {
                    path: resolved,
                    violations,
                });
            }
        }

        self.cache
            .borrow_mut()
            .insert(resolved, content.clone(), modified);
        Ok(content)
    }

    /// Deep-merge `updates` into an existing document and write it back
    /// atomically, with backup-and-restore semantics (default options).
    pub fn update(&self, path: impl AsRef<Path>, updates: &Value) -> Result<()> {
        self.update_with(path, updates, &UpdateOptions::default())
    }

    /// Deep-merge `updates` into an existing document and write it back.
    ///
    /// The target must already exist; updates never create files. On any
    /// failure after the backup was taken, the original file is restored
    /// from it and the original error propagates; the file on disk ends
    /// in either its pre-update or fully-updated state.
    pub fn update_with(
        &self,
        path: impl AsRef<Path>,
        updates: &Value,
        options: &UpdateOptions,
    ) -> Result<()> {
        let resolved = self.resolve(path.as_ref());
        if !resolved.exists() {
            return Err(ConfigError::NotFound { path: resolved });
        }

        let backup = if options.backup {
            Some(self.take_backup(&resolved)?)
        } else {
            None
        };

        match self.apply_update(&resolved, updates, options.schema) {
            Ok(()) => {
                // The write went through; the next load must re-read.
                self.cache.borrow_mut().invalidate(&resolved);
                if let Some(backup) = backup {
                    if let Err(err) = fs::remove_file(&backup) {
                        warn!("could not remove backup {}: {err}", backup.display());
                    }
                }
                Ok(())
            }
            Err(err) => {
                if let Some(backup) = backup {
                    restore_backup(&backup, &resolved);
                }
                Err(err)
            }
        }
    }

    /// Drop any cached copy of a document so the next load re-reads it.
    pub fn invalidate(&self, path: impl AsRef<Path>) {
        let resolved = self.resolve(path.as_ref());
        self.cache.borrow_mut().invalidate(&resolved);
    }

    /// Copy the target aside as `<name>.backup.<unix-timestamp>`.
    fn take_backup(&self, path: &Path) -> Result<PathBuf> {
        let stamp = self.unix_timestamp();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        let backup = path.with_file_name(format!("{file_name}.backup.{stamp}"));
        fs::copy(path, &backup)?;
        debug!("backup taken: {}", backup.display());
        Ok(backup)
    }

    /// Merge, validate, serialize, and atomically rename into place.
    fn apply_update(
        &self,
        resolved: &Path,
        updates: &Value,
        schema: Option<&Schema>,
    ) -> Result<()> {
        // Bypass the cache: a stale cached copy here would silently drop
        // changes another writer landed since we cached.
        let mut merged = self.load_with(resolved, None, false)?;
        deep_merge(&mut merged, updates);

        if let Some(schema) = schema {
            let violations = schema.validate(&merged);
            if !violations.is_empty() {
                return Err(ConfigError::Validation {
                    path: resolved.to_path_buf(),
                    violations,
                });
            }
        }

        let serialized = serde_yaml::to_string(&merged).map_err(|source| ConfigError::Parse {
            path: resolved.to_path_buf(),
            source,
        })?;

        // Temp file in the same directory keeps the rename on one
        // filesystem, which is what makes it atomic.
        let file_name = resolved
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        let tmp = resolved.with_file_name(format!(".{file_name}.tmp.{}", self.unix_timestamp()));
        fs::write(&tmp, &serialized)?;
        if let Err(err) = fs::rename(&tmp, resolved) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }

    fn unix_timestamp(&self) -> u64 {
        self.clock
            .now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Put the original back after a failed update. Best effort: the backup
/// copy still exists on disk if restoration itself fails.
fn restore_backup(backup: &Path, original: &Path) {
    match fs::copy(backup, original) {
        Ok(_) => {
            if let Err(err) = fs::remove_file(backup) {
                warn!("could not remove backup {}: {err}", backup.display());
            }
        }
        Err(err) => {
            warn!(
                "could not restore {} from {}: {err}",
                original.display(),
                backup.display()
            );
        }
    }
}

/// Recursive merge rule: mappings merge key-by-key; everything else,
/// scalars and sequences alike, is replaced wholesale.
pub fn deep_merge(base: &mut Value, updates: &Value) {
    if let (Value::Mapping(base_map), Value::Mapping(update_map)) = (&mut *base, updates) {
        for (key, value) in update_map {
            match base_map.get_mut(key) {
                Some(existing) => deep_merge(existing, value),
                None => {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
    } else {
        *base = updates.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_deep_merge_nested_maps() {
        let mut base = yaml("a:\n  x: 1\n  y: 2\nb: keep\n");
        let updates = yaml("a:\n  y: 3\n  z: 4\n");
        deep_merge(&mut base, &updates);
        assert_eq!(base.get("a").unwrap().get("x").unwrap().as_i64(), Some(1));
        assert_eq!(base.get("a").unwrap().get("y").unwrap().as_i64(), Some(3));
        assert_eq!(base.get("a").unwrap().get("z").unwrap().as_i64(), Some(4));
        assert_eq!(base.get("b").unwrap().as_str(), Some("keep"));
    }

    #[test]
    fn test_deep_merge_scalar_overwrites_map() {
        let mut base = yaml("a:\n  x: 1\n");
        let updates = yaml("a: flat\n");
        deep_merge(&mut base, &updates);
        assert_eq!(base.get("a").unwrap().as_str(), Some("flat"));
    }

    #[test]
    fn test_deep_merge_map_overwrites_scalar() {
        let mut base = yaml("a: flat\n");
        let updates = yaml("a:\n  x: 1\n");
        deep_merge(&mut base, &updates);
        assert_eq!(base.get("a").unwrap().get("x").unwrap().as_i64(), Some(1));
    }

    #[test]
    fn test_deep_merge_replaces_lists_wholesale() {
        // Lists are replaced, never merged or appended.
        let mut base = yaml("items: [1, 2, 3]\n");
        let updates = yaml("items: [9]\n");
        deep_merge(&mut base, &updates);
        let items = base.get("items").unwrap().as_sequence().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_i64(), Some(9));
    }

    #[test]
    fn test_deep_merge_adds_new_keys() {
        let mut base = yaml("a: 1\n");
        let updates = yaml("b:\n  nested: true\n");
        deep_merge(&mut base, &updates);
        assert_eq!(
            base.get("b").unwrap().get("nested").unwrap().as_bool(),
            Some(true)
        );
    }
}
