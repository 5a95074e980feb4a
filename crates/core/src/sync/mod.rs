//! History synchronizer.
//!
//! Keeps a rolling, deduplicated cache of visited items consistent with an
//! external history source:
//!
//! - Browser events only mark the cache dirty; they never block.
//! - A fixed-interval loop reconciles dirty state by re-reading a trailing
//!   window of history and merging it into the cached items.
//! - Deletions can touch arbitrarily old entries, so they force one full
//!   rescan from time zero.
//! - Readers get a point-in-time snapshot; the cache is replaced by
//!   swapping in a new vector, never mutated in place.

pub mod merge;
pub mod watcher;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::time::MissedTickBehavior;

use crate::config::AppConfig;
use crate::history::{Clock, HistorySource};
use crate::policy::DomainPolicy;
use crate::{Error, VisitedItem};

pub use merge::merge_window;
pub use watcher::HistoryWatcher;

/// External events that can invalidate the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    /// A page visit was recorded.
    VisitRecorded,
    /// One or more history entries were deleted.
    VisitRemoved,
    /// A tab navigated or was closed.
    TabChanged,
}

/// Result of a single reconciliation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing changed since the last reconciliation.
    Idle,
    /// The cache was rebuilt from a history window.
    Refreshed { full: bool, start_time: i64, items: usize },
}

/// Timing knobs for the synchronizer.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Length of the trailing window re-read on incremental reconciliations.
    pub refresh_duration: Duration,
    /// Upper bound on a single history search.
    pub history_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { refresh_duration: Duration::from_secs(5 * 60), history_timeout: Duration::from_secs(10) }
    }
}

impl From<&AppConfig> for SyncOptions {
    fn from(config: &AppConfig) -> Self {
        Self { refresh_duration: config.refresh_duration(), history_timeout: config.history_timeout() }
    }
}

/// Counters describing the synchronizer's work so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SyncStats {
    /// Items currently cached.
    pub items: usize,
    /// Start of the next incremental window (epoch ms); 0 means full resync.
    pub window_start: i64,
    /// Completed reconciliations.
    pub reconciles: u64,
    /// Reconciliations that failed and will be retried.
    pub failures: u64,
    /// Duration of the last completed reconciliation.
    pub last_reconcile_ms: Option<u64>,
}

/// Owner of the visited-item cache.
pub struct HistorySynchronizer {
    source: Arc<dyn HistorySource>,
    clock: Arc<dyn Clock>,
    policy: Arc<DomainPolicy>,
    options: SyncOptions,

    items: RwLock<Arc<Vec<VisitedItem>>>,
    /// Start of the next incremental window; `None` forces a full resync.
    /// Held for the whole reconciliation, so runs never overlap.
    window_start: Mutex<Option<i64>>,
    dirty: AtomicBool,
    pending_full_resync: AtomicBool,
    stats: RwLock<SyncStats>,
}

impl HistorySynchronizer {
    /// Create a synchronizer with an empty cache.
    ///
    /// The cache starts dirty so the first tick performs the initial full
    /// reconciliation.
    pub fn new(
        source: Arc<dyn HistorySource>, clock: Arc<dyn Clock>, policy: Arc<DomainPolicy>, options: SyncOptions,
    ) -> Self {
        Self {
            source,
            clock,
            policy,
            options,
            items: RwLock::new(Arc::new(Vec::new())),
            window_start: Mutex::new(None),
            dirty: AtomicBool::new(true),
            pending_full_resync: AtomicBool::new(false),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Record that the external history or tab state changed.
    pub fn on_external_change(&self, kind: ChangeKind) {
        if kind == ChangeKind::VisitRemoved {
            self.pending_full_resync.store(true, Ordering::Release);
        }
        self.dirty.store(true, Ordering::Release);
        tracing::trace!(?kind, "history change observed");
    }

    /// Whether a change has been observed since the last reconciliation.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Bring the cache up to date with the history source.
    ///
    /// A no-op unless a change has been observed. On failure the change
    /// markers are restored so the next tick retries.
    ///
    /// # Errors
    ///
    /// Returns the history source's error, or [`Error::HistoryTimeout`] when
    /// the search exceeds the configured timeout.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, Error> {
        let mut window_start = self.window_start.lock().await;

        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(ReconcileOutcome::Idle);
        }

        let deletion = self.pending_full_resync.swap(false, Ordering::AcqRel);
        let full = deletion || window_start.is_none();
        let start_time = if full { 0 } else { window_start.unwrap_or(0) };
        let started = Instant::now();

        let fetched = match tokio::time::timeout(self.options.history_timeout, self.source.search(start_time)).await {
            Ok(Ok(entries)) => entries,
            Ok(Err(err)) => return Err(self.retry_later(deletion, err)),
            Err(_) => return Err(self.retry_later(deletion, Error::HistoryTimeout(self.options.history_timeout))),
        };

        let fresh = fetched.into_iter().map(VisitedItem::from_entry);
        let merged = if full {
            merge_window(fresh, None)
        } else {
            let previous = self.snapshot();
            merge_window(fresh, Some(previous.as_slice()))
        };
        let count = merged.len();
        *self.items.write() = Arc::new(merged);

        // a deletion that landed while we were searching may have hit entries
        // older than the window we just read
        *window_start = if self.pending_full_resync.load(Ordering::Acquire) {
            None
        } else {
            let refresh_ms = i64::try_from(self.options.refresh_duration.as_millis()).unwrap_or(i64::MAX);
            Some(self.clock.now_millis().saturating_sub(refresh_ms))
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        {
            let mut stats = self.stats.write();
            stats.items = count;
            stats.window_start = window_start.unwrap_or(0);
            stats.reconciles += 1;
            stats.last_reconcile_ms = Some(elapsed_ms);
        }

        tracing::debug!(full, start_time, items = count, elapsed_ms, "reconciled visited items");
        Ok(ReconcileOutcome::Refreshed { full, start_time, items: count })
    }

    fn retry_later(&self, deletion: bool, err: Error) -> Error {
        if deletion {
            self.pending_full_resync.store(true, Ordering::Release);
        }
        self.dirty.store(true, Ordering::Release);
        self.stats.write().failures += 1;
        err
    }

    /// Current cache contents, most recent first.
    pub fn snapshot(&self) -> Arc<Vec<VisitedItem>> {
        Arc::clone(&self.items.read())
    }

    /// Visited items for `domain`, most recent first.
    ///
    /// An absent or empty domain returns every cached item. `limit` values
    /// of zero or below mean no limit.
    pub fn query(&self, domain: Option<&str>, limit: Option<i64>) -> Vec<VisitedItem> {
        let items = self.snapshot();
        let limit = match limit {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => usize::MAX,
        };

        match domain.map(str::trim).filter(|d| !d.is_empty()) {
            None => items.iter().take(limit).cloned().collect(),
            Some(domain) => {
                let scope = self.policy.scope(domain);
                items
                    .iter()
                    .filter(|item| scope.matches(&item.domain))
                    .take(limit)
                    .cloned()
                    .collect()
            }
        }
    }

    /// Counters for diagnostics.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Reconcile every `interval` until `shutdown` flips to true or its
    /// sender is dropped.
    ///
    /// Failed reconciliations are logged and retried on the next tick. Ticks
    /// that fall behind are delayed rather than bunched up.
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_ms = interval.as_millis() as u64, "history synchronizer started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.reconcile().await {
                        tracing::warn!(error = %err, "history reconciliation failed; retrying next tick");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(stats = ?self.stats(), "history synchronizer stopped");
    }
}
