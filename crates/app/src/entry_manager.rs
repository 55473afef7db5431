//! Entry manager: setup, unload, reload and retry of config entries.
//!
//! The manager owns one [`EntryContext`] per loaded entry and tracks the
//! [`EntryState`] of every entry of its integration variant. Lifecycle
//! operations are serialized by a single lock, so an entry is never set up
//! twice concurrently. Refresh loops of loaded entries keep running while a
//! lifecycle operation is in progress.
//!
//! A setup failing with [`SetupError::NotReady`] is retried in the background
//! with exponential backoff (see [`retry_delay`]). A setup failing with
//! [`SetupError::Unauthorized`] stays failed until the entry is reloaded or
//! reconfigured.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::AbortHandle;

use meteobridge_domain::config_entry::{ConfigEntry, EntryState};
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::error::{MeteobridgeError, NotFoundError};
use meteobridge_domain::id::EntryId;
use meteobridge_domain::variant::IntegrationVariant;

use crate::config_flow::ConfigFlow;
use crate::entry::EntryContext;
use crate::error::{FlowError, SetupError};
use crate::ports::{ConfigEntryRepository, DataSourceFactory};

/// Delay between a successful reconfiguration and the reload of the entry.
pub const RELOAD_DELAY: Duration = Duration::from_secs(2);

const RETRY_BASE_DELAY: Duration = Duration::from_secs(5);
const RETRY_MAX_DOUBLINGS: u32 = 4;

const ISSUE_TRACKER: &str = "https://github.com/briis/meteobridgesql/issues";

/// Wait before the retry following `tries` failed retries.
///
/// 5 s, 10 s, 20 s, 40 s, then 80 s for every later attempt.
#[must_use]
pub fn retry_delay(tries: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.pow(tries.min(RETRY_MAX_DOUBLINGS))
}

/// A config entry together with its runtime state.
#[derive(Debug, Clone)]
pub struct EntryStatus {
    pub entry: ConfigEntry,
    pub state: EntryState,
    /// Why the last setup failed, while the entry is retrying or failed.
    pub error: Option<SetupError>,
}

struct Slot<S> {
    state: EntryState,
    context: Option<Arc<EntryContext<S>>>,
    error: Option<SetupError>,
    retry: Option<AbortHandle>,
    reload: Option<AbortHandle>,
}

impl<S> Default for Slot<S> {
    fn default() -> Self {
        Self {
            state: EntryState::NotLoaded,
            context: None,
            error: None,
            retry: None,
            reload: None,
        }
    }
}

impl<S> Slot<S> {
    fn cancel_retry(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
    }

    fn cancel_reload(&mut self) {
        if let Some(reload) = self.reload.take() {
            reload.abort();
        }
    }
}

type Slots<S> = HashMap<EntryId, Slot<S>>;

struct Inner<R, F: DataSourceFactory> {
    repo: R,
    factory: F,
    variant: IntegrationVariant,
    slots: RwLock<Slots<F::Source>>,
    lifecycle: Mutex<()>,
}

/// Runs the config entries of one integration variant.
///
/// Cheap to clone; clones share the same entries.
pub struct EntryManager<R, F: DataSourceFactory> {
    inner: Arc<Inner<R, F>>,
}

impl<R, F: DataSourceFactory> Clone for EntryManager<R, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, F> EntryManager<R, F>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    pub fn new(repo: R, factory: F, variant: IntegrationVariant) -> Self {
        Self {
            inner: Arc::new(Inner {
                repo,
                factory,
                variant,
                slots: RwLock::new(HashMap::new()),
                lifecycle: Mutex::new(()),
            }),
        }
    }

    #[must_use]
    pub fn variant(&self) -> IntegrationVariant {
        self.inner.variant
    }

    /// Set up every persisted entry of the variant.
    ///
    /// Returns the number of entries found. Entries failing setup are kept in
    /// their failed or retrying state.
    ///
    /// # Errors
    ///
    /// Returns a storage error when entries cannot be listed.
    pub async fn load_all(&self) -> Result<usize, MeteobridgeError> {
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            domain = self.inner.variant.domain(),
            issues = ISSUE_TRACKER,
            "starting Meteobridge SQL integration"
        );
        let entries = self.domain_entries().await?;
        for entry in &entries {
            self.setup_entry(entry.id).await?;
        }
        Ok(entries.len())
    }

    /// Set up an entry, unloading it first when it is loaded.
    ///
    /// Returns the resulting state; setup failures are not errors.
    ///
    /// # Errors
    ///
    /// Returns [`MeteobridgeError::NotFound`] for an unknown entry or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn setup_entry(&self, id: EntryId) -> Result<EntryState, MeteobridgeError> {
        let _guard = self.inner.lifecycle.lock().await;
        let entry = self.find(id).await?;
        self.unload_locked(id).await;
        Ok(self.setup_locked(entry).await)
    }

    /// Unload an entry. Its configuration stays persisted.
    ///
    /// # Errors
    ///
    /// Returns [`MeteobridgeError::NotFound`] for an unknown entry or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn unload_entry(&self, id: EntryId) -> Result<(), MeteobridgeError> {
        let _guard = self.inner.lifecycle.lock().await;
        self.find(id).await?;
        self.unload_locked(id).await;
        Ok(())
    }

    /// Unload and set up an entry again, with its persisted configuration.
    ///
    /// # Errors
    ///
    /// Same as [`setup_entry`](Self::setup_entry).
    pub async fn reload_entry(&self, id: EntryId) -> Result<EntryState, MeteobridgeError> {
        tracing::info!(entry_id = %id, "reloading entry");
        self.setup_entry(id).await
    }

    /// Reload an entry after `delay`. A reload scheduled earlier for the same
    /// entry is cancelled.
    pub async fn schedule_reload(&self, id: EntryId, delay: Duration) {
        let manager = self.clone();
        let reload = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = manager.reload_entry(id).await {
                tracing::warn!(entry_id = %id, error = %err, "scheduled reload failed");
            }
        })
        .abort_handle();
        self.update_slot(id, |slot| {
            slot.cancel_reload();
            slot.reload = Some(reload);
        })
        .await;
    }

    /// Run the config flow and set up the created entry.
    ///
    /// # Errors
    ///
    /// Returns the [`FlowError`] of the config flow. A failing setup is not
    /// an error; check the returned state.
    pub async fn create_entry(
        &self,
        input: ConnectionConfig,
    ) -> Result<(ConfigEntry, EntryState), FlowError> {
        let entry = self.flow().user_step(input).await?;
        let state = self.setup_entry(entry.id).await?;
        Ok((entry, state))
    }

    /// Run the options flow for an entry and reload it after
    /// [`RELOAD_DELAY`].
    ///
    /// # Errors
    ///
    /// Returns the [`FlowError`] of the options flow, with
    /// [`MeteobridgeError::NotFound`] wrapped for an unknown entry.
    pub async fn reconfigure_entry(
        &self,
        id: EntryId,
        input: ConnectionConfig,
    ) -> Result<ConfigEntry, FlowError> {
        let entry = self.find(id).await?;
        let entry = self.flow().options_step(entry, input).await?;
        self.schedule_reload(id, RELOAD_DELAY).await;
        Ok(entry)
    }

    /// Unload an entry and delete its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MeteobridgeError::NotFound`] for an unknown entry or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_entry(&self, id: EntryId) -> Result<(), MeteobridgeError> {
        let _guard = self.inner.lifecycle.lock().await;
        self.find(id).await?;
        self.unload_locked(id).await;
        let slot = self.inner.slots.write().await.remove(&id);
        if let Some(mut slot) = slot {
            slot.cancel_reload();
        }
        self.inner.repo.delete(id).await?;
        tracing::info!("entry removed");
        Ok(())
    }

    /// Every entry of the variant with its runtime state, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when entries cannot be listed.
    pub async fn entries(&self) -> Result<Vec<EntryStatus>, MeteobridgeError> {
        let entries = self.domain_entries().await?;
        let slots = self.inner.slots.read().await;
        Ok(entries
            .into_iter()
            .map(|entry| status_of(&slots, entry))
            .collect())
    }

    /// One entry with its runtime state.
    ///
    /// # Errors
    ///
    /// Returns [`MeteobridgeError::NotFound`] for an unknown entry or a
    /// storage error.
    pub async fn entry(&self, id: EntryId) -> Result<EntryStatus, MeteobridgeError> {
        let entry = self.find(id).await?;
        let slots = self.inner.slots.read().await;
        Ok(status_of(&slots, entry))
    }

    /// Runtime context of a loaded entry.
    pub async fn context(&self, id: EntryId) -> Option<Arc<EntryContext<F::Source>>> {
        self.inner
            .slots
            .read()
            .await
            .get(&id)
            .and_then(|slot| slot.context.clone())
    }

    /// Unload every entry and cancel pending retries and reloads.
    pub async fn shutdown(&self) {
        let _guard = self.inner.lifecycle.lock().await;
        let ids: Vec<EntryId> = {
            let mut slots = self.inner.slots.write().await;
            for slot in slots.values_mut() {
                slot.cancel_reload();
            }
            slots.keys().copied().collect()
        };
        for id in ids {
            self.unload_locked(id).await;
        }
        tracing::info!("all entries unloaded");
    }

    fn flow(&self) -> ConfigFlow<'_, F, R> {
        ConfigFlow::new(&self.inner.factory, &self.inner.repo, self.inner.variant)
    }

    async fn domain_entries(&self) -> Result<Vec<ConfigEntry>, MeteobridgeError> {
        let domain = self.inner.variant.domain();
        let mut entries = self.inner.repo.get_all().await?;
        entries.retain(|entry| entry.domain == domain);
        Ok(entries)
    }

    async fn find(&self, id: EntryId) -> Result<ConfigEntry, MeteobridgeError> {
        let domain = self.inner.variant.domain();
        self.inner
            .repo
            .get_by_id(id)
            .await?
            .filter(|entry| entry.domain == domain)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "ConfigEntry",
                    id: id.to_string(),
                }
                .into()
            })
    }

    async fn update_slot(&self, id: EntryId, f: impl FnOnce(&mut Slot<F::Source>)) {
        f(self.inner.slots.write().await.entry(id).or_default());
    }

    /// Expects the lifecycle lock to be held.
    async fn unload_locked(&self, id: EntryId) {
        let context = {
            let mut slots = self.inner.slots.write().await;
            let Some(slot) = slots.get_mut(&id) else {
                return;
            };
            slot.cancel_retry();
            slot.state = EntryState::NotLoaded;
            slot.error = None;
            slot.context.take()
        };
        if let Some(context) = context {
            context.unload().await;
        }
    }

    /// Expects the lifecycle lock to be held.
    async fn setup_locked(&self, entry: ConfigEntry) -> EntryState {
        let id = entry.id;
        self.update_slot(id, |slot| slot.state = EntryState::SetupInProgress)
            .await;

        match self.try_setup(entry).await {
            Ok(()) => EntryState::Loaded,
            Err(err) if err.is_retryable() => {
                tracing::warn!(
                    entry_id = %id,
                    error = %err,
                    cause = %err.cause(),
                    retry_in = ?retry_delay(0),
                    "entry not ready, will retry"
                );
                let retry = self.spawn_retry(id);
                self.update_slot(id, |slot| {
                    slot.state = EntryState::SetupRetry;
                    slot.error = Some(err);
                    slot.retry = Some(retry);
                })
                .await;
                EntryState::SetupRetry
            }
            Err(err) => {
                tracing::error!(entry_id = %id, error = %err, cause = %err.cause(), "entry setup failed");
                self.update_slot(id, |slot| {
                    slot.state = EntryState::SetupError;
                    slot.error = Some(err);
                })
                .await;
                EntryState::SetupError
            }
        }
    }

    async fn try_setup(&self, entry: ConfigEntry) -> Result<(), SetupError> {
        let id = entry.id;
        let context = EntryContext::setup(&self.inner.factory, entry, self.inner.variant).await?;
        self.install(id, context).await;
        Ok(())
    }

    async fn install(&self, id: EntryId, context: EntryContext<F::Source>) {
        self.update_slot(id, |slot| {
            slot.state = EntryState::Loaded;
            slot.context = Some(Arc::new(context));
            slot.error = None;
            slot.retry = None;
        })
        .await;
    }

    async fn retry_pending(&self, id: EntryId) -> bool {
        self.inner
            .slots
            .read()
            .await
            .get(&id)
            .is_some_and(|slot| slot.state == EntryState::SetupRetry)
    }

    fn spawn_retry(&self, id: EntryId) -> AbortHandle {
        let manager = self.clone();
        tokio::spawn(async move { manager.retry_loop(id).await }).abort_handle()
    }

    /// Setup attempts run without the lifecycle lock so a slow database does
    /// not hold up other entries. The outcome is only applied if the entry is
    /// still waiting for a retry once the lock is taken again.
    async fn retry_loop(&self, id: EntryId) {
        let mut tries = 0;
        loop {
            tokio::time::sleep(retry_delay(tries)).await;
            tries += 1;

            let entry = {
                let _guard = self.inner.lifecycle.lock().await;
                if !self.retry_pending(id).await {
                    return;
                }
                match self.find(id).await {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!(entry_id = %id, error = %err, "giving up setup retries");
                        return;
                    }
                }
            };

            tracing::debug!(entry_id = %id, attempt = tries, "retrying entry setup");
            let attempt =
                EntryContext::setup(&self.inner.factory, entry, self.inner.variant).await;

            let _guard = self.inner.lifecycle.lock().await;
            if !self.retry_pending(id).await {
                if let Ok(context) = attempt {
                    context.unload().await;
                }
                return;
            }
            match attempt {
                Ok(context) => {
                    self.install(id, context).await;
                    return;
                }
                Err(err) if err.is_retryable() => {
                    tracing::warn!(
                        entry_id = %id,
                        error = %err,
                        cause = %err.cause(),
                        retry_in = ?retry_delay(tries),
                        "entry still not ready"
                    );
                    self.update_slot(id, |slot| slot.error = Some(err)).await;
                }
                Err(err) => {
                    tracing::error!(entry_id = %id, error = %err, cause = %err.cause(), "entry setup failed");
                    self.update_slot(id, |slot| {
                        slot.state = EntryState::SetupError;
                        slot.error = Some(err);
                        slot.retry = None;
                    })
                    .await;
                    return;
                }
            }
        }
    }
}

fn status_of<S>(slots: &Slots<S>, entry: ConfigEntry) -> EntryStatus {
    let slot = slots.get(&entry.id);
    EntryStatus {
        state: slot.map_or(EntryState::NotLoaded, |slot| slot.state),
        error: slot.and_then(|slot| slot.error.clone()),
        entry,
    }
}
