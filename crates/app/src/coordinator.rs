//! Polling coordinator: refreshes one station on a fixed interval.
//!
//! The coordinator owns the [`DataAdapter`] of an entry and caches the last
//! successful [`FetchResult`]. State lives in a [`watch`] channel: readers
//! borrow the latest value, subscribers are woken when a refresh starts and
//! when it completes.
//!
//! A successful refresh swaps the cached snapshot for a new `Arc` in one
//! step, so readers see either the old or the new snapshot, never a mix. A
//! failed refresh keeps the old snapshot and records an [`UpdateFailed`].

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use meteobridge_domain::snapshot::FetchResult;
use meteobridge_domain::time::{Timestamp, now};

use crate::data_adapter::DataAdapter;
use crate::error::{SetupError, UpdateFailed};
use crate::ports::DataSource;

/// Time between two scheduled refreshes.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Where the coordinator is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorStatus {
    #[default]
    Uninitialized,
    Refreshing,
    Ready,
    /// The last refresh failed. The next tick tries again.
    Failed,
}

/// Snapshot of a coordinator, as seen by readers and subscribers.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorState {
    pub status: CoordinatorStatus,
    pub data: Option<Arc<FetchResult>>,
    pub last_update_success: bool,
    pub last_error: Option<UpdateFailed>,
    /// When the last refresh completed, successful or not.
    pub last_update: Option<Timestamp>,
}

/// Refreshes one station and caches the result.
pub struct Coordinator<S> {
    name: String,
    adapter: DataAdapter<S>,
    state: watch::Sender<CoordinatorState>,
    refresh_lock: Mutex<()>,
}

impl<S: DataSource> Coordinator<S> {
    pub fn new(name: impl Into<String>, adapter: DataAdapter<S>) -> Self {
        let (state, _) = watch::channel(CoordinatorState::default());
        Self {
            name: name.into(),
            adapter,
            state,
            refresh_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn adapter(&self) -> &DataAdapter<S> {
        &self.adapter
    }

    /// Refresh once before the entry counts as set up.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Unauthorized`] when the database is unreachable
    /// and [`SetupError::NotReady`] for any other failure.
    pub async fn first_refresh(&self) -> Result<(), SetupError> {
        self.refresh()
            .await
            .map_err(|failed| SetupError::from(failed.into_cause()))
    }

    /// Refresh now.
    ///
    /// Waits for an in-flight refresh to finish first, so refreshes never
    /// overlap.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateFailed`] when the fetch failed. The cached snapshot is
    /// left untouched in that case.
    #[tracing::instrument(skip(self), fields(coordinator = %self.name))]
    pub async fn refresh(&self) -> Result<(), UpdateFailed> {
        let _guard = self.refresh_lock.lock().await;
        self.state
            .send_modify(|state| state.status = CoordinatorStatus::Refreshing);

        match self.adapter.fetch().await {
            Ok(result) => {
                let data = Arc::new(result);
                self.state.send_modify(|state| {
                    state.status = CoordinatorStatus::Ready;
                    state.data = Some(data);
                    state.last_update_success = true;
                    state.last_error = None;
                    state.last_update = Some(now());
                });
                tracing::debug!("refresh succeeded");
                Ok(())
            }
            Err(err) => {
                let failed = UpdateFailed::new(err);
                tracing::warn!(error = %failed, cause = %failed.cause(), "refresh failed");
                self.state.send_modify(|state| {
                    state.status = CoordinatorStatus::Failed;
                    state.last_update_success = false;
                    state.last_error = Some(failed.clone());
                    state.last_update = Some(now());
                });
                Err(failed)
            }
        }
    }

    /// Spawn the refresh loop.
    ///
    /// The first scheduled refresh happens one interval from now. Abort the
    /// returned handle to stop the loop.
    pub fn start(self: &Arc<Self>) -> AbortHandle {
        let coordinator = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(Instant::now() + REFRESH_INTERVAL, REFRESH_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Failures are recorded in the state and logged by `refresh`.
                let _ = coordinator.refresh().await;
            }
        });
        task.abort_handle()
    }

    /// Latest successful snapshot, if any.
    #[must_use]
    pub fn data(&self) -> Option<Arc<FetchResult>> {
        self.state.borrow().data.clone()
    }

    /// Current coordinator state.
    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.state.borrow().last_update_success
    }

    /// Receive a notification when a refresh starts and when it completes.
    ///
    /// Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    /// Release the data source connection.
    pub async fn close(&self) {
        self.adapter.close().await;
    }
}
