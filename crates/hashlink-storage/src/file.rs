use crate::snapshot::Snapshot;
use async_trait::async_trait;
use dashmap::DashMap;
use hashlink_core::error::{Result, StoreError};
use hashlink_core::{ShortCode, Store};
use std::collections::btree_map::Entry;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

/// Settings for opening a [`FileStore`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct FileStoreSettings {
    /// Location of the JSON snapshot file.
    #[builder(setter(into))]
    path: PathBuf,
    /// Upper bound for each read and each temporary-file write.
    #[builder(default, setter(strip_option))]
    io_timeout: Option<Duration>,
}

/// One writer lock per backing file, shared by every `FileStore` in the
/// process that points at it.
fn writer_for(path: &Path) -> Arc<Mutex<()>> {
    static WRITERS: OnceLock<DashMap<PathBuf, Arc<Mutex<()>>>> = OnceLock::new();
    WRITERS
        .get_or_init(DashMap::new)
        .entry(path.to_path_buf())
        .or_default()
        .clone()
}

/// Resolves the key of the writer lock for `path`.
///
/// The key must be the same before and after the file exists, so a missing
/// file is keyed on its resolved parent directory.
async fn lock_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = tokio::fs::canonicalize(path).await {
        return canonical;
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (tokio::fs::canonicalize(parent).await, path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

/// Matches the names produced by [`FileStore::tmp_path`] for `file_name`.
fn is_tmp_name(candidate: &str, file_name: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    candidate
        .strip_prefix(file_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(".tmp"))
        .and_then(|rest| rest.split_once('.'))
        .is_some_and(|(pid, seq)| all_digits(pid) && all_digits(seq))
}

/// A [`Store`] backed by a single JSON file.
///
/// Every operation reads and parses the whole file. Mutations rewrite the
/// whole snapshot into a temporary sibling file and rename it over the
/// original, so the file on disk is always the last committed snapshot.
/// Mutations on the same file are serialized through one async mutex;
/// reads take no lock.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    io_timeout: Option<Duration>,
    writer: Arc<Mutex<()>>,
}

impl FileStore {
    /// Opens the store, creating the file with an empty `v1` snapshot if it
    /// does not exist yet.
    ///
    /// Creation happens under the file's writer lock, so a concurrent open of
    /// the same missing file cannot replace a snapshot another instance has
    /// already committed. Temporary files left next to the backing file by
    /// earlier writes are removed at the same time.
    ///
    /// An existing file is not parsed here; a corrupt snapshot is reported
    /// by the first operation that reads it.
    pub async fn open(settings: FileStoreSettings) -> Result<Self> {
        let FileStoreSettings { path, io_timeout } = settings;

        let store = Self {
            writer: writer_for(&lock_key(&path).await),
            path,
            io_timeout,
        };

        {
            let _writer = store.writer.lock().await;

            let exists = tokio::fs::try_exists(&store.path).await.map_err(|e| {
                StoreError::Unavailable(format!("unable to stat {}: {e}", store.path.display()))
            })?;

            if exists {
                store.remove_stale_tmp_files().await;
            } else {
                store.persist(&Snapshot::new()).await.map_err(|e| {
                    StoreError::Unavailable(format!(
                        "unable to create store file {}: {e}",
                        store.path.display()
                    ))
                })?;
                info!(path = %store.path.display(), "created empty store file");
            }
        }

        debug!(path = %store.path.display(), "opened file store");
        Ok(store)
    }

    /// Opens the store at `path` with default settings.
    pub async fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(FileStoreSettings::builder().path(path).build()).await
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the last committed snapshot.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.load().await
    }

    async fn load(&self) -> Result<Snapshot> {
        let raw = self
            .bounded("read", tokio::fs::read(&self.path))
            .await?;
        Snapshot::from_slice(&raw).inspect_err(|e| {
            warn!(path = %self.path.display(), error = %e, "store snapshot is corrupt");
        })
    }

    /// Commits `snapshot` through a fresh temporary file.
    ///
    /// A write abandoned on timeout keeps running on the blocking pool and
    /// may still create its temporary file after the error is returned. The
    /// backing file is never touched by it; the leftover is removed by the
    /// next `open`.
    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        self.commit(snapshot, &self.tmp_path()).await
    }

    async fn commit(&self, snapshot: &Snapshot, tmp_path: &Path) -> Result<()> {
        let raw = snapshot.to_vec()?;

        if let Err(e) = self
            .bounded("write", tokio::fs::write(tmp_path, raw))
            .await
        {
            let _ = tokio::fs::remove_file(tmp_path).await;
            return Err(e);
        }

        // The rename is the commit point and is never abandoned half way.
        if let Err(e) = tokio::fs::rename(tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(tmp_path).await;
            return Err(StoreError::Unavailable(format!(
                "unable to replace {}: {e}",
                self.path.display()
            )));
        }

        Ok(())
    }

    /// Removes `<file>.<pid>.<seq>.tmp` siblings of the backing file.
    ///
    /// Runs under the writer lock, so no commit from this process is in
    /// flight. Failures are logged and otherwise ignored.
    async fn remove_stale_tmp_files(&self) {
        let Some(file_name) = self.path.file_name().and_then(|name| name.to_str()) else {
            return;
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "unable to scan for stale temporary files");
                return;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name();
            if !name.to_str().is_some_and(|name| is_tmp_name(name, file_name)) {
                continue;
            }
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => info!(path = %entry.path().display(), "removed stale temporary file"),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "unable to remove stale temporary file")
                }
            }
        }
    }

    /// A fresh temporary path next to the backing file.
    ///
    /// Each write gets its own name so that a write left running after a
    /// timeout cannot interleave with the next one.
    fn tmp_path(&self) -> PathBuf {
        static TMP_SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        PathBuf::from(name)
    }

    async fn bounded<T>(
        &self,
        op: &str,
        fut: impl Future<Output = std::io::Result<T>>,
    ) -> Result<T> {
        let result = match self.io_timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                StoreError::Timeout(format!(
                    "{op} of {} exceeded {limit:?}",
                    self.path.display()
                ))
            })?,
            None => fut.await,
        };

        result.map_err(|e| {
            StoreError::Unavailable(format!("unable to {op} {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl Store for FileStore {
    async fn add(&self, code: &ShortCode, url: &str) -> Result<()> {
        let _writer = self.writer.lock().await;

        let mut snapshot = self.load().await?;
        match snapshot.items.entry(code.to_string()) {
            Entry::Occupied(_) => return Err(StoreError::AlreadyExists(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(url.to_owned());
            }
        }
        self.persist(&snapshot).await?;

        debug!(code = %code, items = snapshot.len(), "added mapping to file store");
        Ok(())
    }

    async fn remove(&self, code: &ShortCode) -> Result<()> {
        let _writer = self.writer.lock().await;

        let mut snapshot = self.load().await?;
        if snapshot.items.remove(code.as_str()).is_none() {
            return Err(StoreError::NotFound(code.to_string()));
        }
        self.persist(&snapshot).await?;

        debug!(code = %code, items = snapshot.len(), "removed mapping from file store");
        Ok(())
    }

    async fn get(&self, code: &ShortCode) -> Result<String> {
        let mut snapshot = self.load().await?;
        snapshot
            .items
            .remove(code.as_str())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }
}
