//! File watch on a Chromium `History` database.
//!
//! The browser writes visits through SQLite, which touches the database file
//! and its `-journal`/`-wal` siblings. Any such write marks the synchronizer
//! dirty so the next tick re-reads the trailing window.
//!
//! File events cannot tell an added visit from a deleted one, so every write
//! is reported as [`ChangeKind::VisitRecorded`]. Deletions older than the
//! refresh window only disappear once a `visitRemoved` event arrives through
//! the bridge.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::{ChangeKind, HistorySynchronizer};
use crate::Error;

/// Marks a synchronizer dirty whenever the watched history file changes.
///
/// Watching stops when this value is dropped.
pub struct HistoryWatcher {
    _watcher: RecommendedWatcher,
}

impl HistoryWatcher {
    /// Watch `path` (and its journal files) on behalf of `sync`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `path` has no file name, or
    /// [`Error::History`] if the platform watcher cannot be started.
    pub fn spawn(path: impl AsRef<Path>, sync: Arc<HistorySynchronizer>) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| Error::InvalidInput(format!("history path {} has no file name", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let (tx, mut rx) = mpsc::channel(128);
        let mut watcher = notify::recommended_watcher(move |res| {
            if tx.blocking_send(res).is_err() {
                tracing::debug!("history watch channel closed");
            }
        })
        .map_err(|e| Error::History(format!("cannot start file watcher: {e}")))?;

        // the directory, not the file: journals come and go and the browser
        // may replace the database
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::History(format!("cannot watch {}: {e}", dir.display())))?;

        tokio::spawn(async move {
            while let Some(res) = rx.recv().await {
                match res {
                    Ok(event) if touches_history(&event, &name) => {
                        sync.on_external_change(ChangeKind::VisitRecorded);
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "history watcher error"),
                }
            }
            tracing::debug!("history watcher stopped");
        });

        tracing::info!(dir = %dir.display(), file = ?path.file_name(), "watching history database");
        Ok(Self { _watcher: watcher })
    }
}

/// Whether `event` writes to the database named `name` or one of its
/// SQLite sidecar files.
fn touches_history(event: &Event, name: &OsStr) -> bool {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .filter_map(|path| path.file_name())
        .any(|file| is_history_file(file, name))
}

fn is_history_file(file: &OsStr, name: &OsStr) -> bool {
    if file == name {
        return true;
    }
    match (file.to_str(), name.to_str()) {
        (Some(file), Some(name)) => file
            .strip_prefix(name)
            .is_some_and(|suffix| matches!(suffix, "-journal" | "-wal" | "-shm")),
        _ => false,
    }
}
