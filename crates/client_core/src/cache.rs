//! Session-wide cache of the leave-type collection.
//!
//! The store holds exactly one current value: the data of the most recent
//! successful fetch, stamped with a version that increases on every
//! successful fetch. Consumers read it through [`ResourceCacheStore::snapshot`]
//! or watch it through [`ResourceCacheStore::subscribe`]. Nothing but a
//! completed fetch writes to it; mutations elsewhere only ask for a refresh.

use std::sync::Arc;

use shared::domain::LeaveType;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{api::LeaveTypeApi, error::RequestError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
    pub version: u64,
    pub data: Arc<Vec<LeaveType>>,
    pub is_loading: bool,
    pub last_error: Option<RequestError>,
    pub(crate) refetch_queued: bool,
}

impl CacheState {
    pub fn view(&self) -> &[LeaveType] {
        &self.data
    }

    pub fn has_fetched(&self) -> bool {
        self.version > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// This call ran the fetch (and any follow-up queued while it ran).
    Fetched { version: u64 },
    /// A fetch was already in flight; it will run once more before finishing.
    Coalesced,
    Failed(RequestError),
}

pub struct ResourceCacheStore {
    api: Arc<dyn LeaveTypeApi>,
    state: watch::Sender<CacheState>,
}

impl ResourceCacheStore {
    pub fn new(api: Arc<dyn LeaveTypeApi>) -> Self {
        let (state, _) = watch::channel(CacheState::default());
        Self { api, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CacheState {
        self.state.borrow().clone()
    }

    /// Data of the latest successful fetch, empty before the first one.
    pub fn current_view(&self) -> Arc<Vec<LeaveType>> {
        Arc::clone(&self.state.borrow().data)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// Refreshes the collection from the server.
    ///
    /// At most one `list` call is in flight at a time. A request that arrives
    /// while one is running queues a single follow-up fetch, which the running
    /// caller performs before clearing the loading flag. Dropping the running
    /// caller clears the flag and the queued follow-up.
    pub async fn request_fetch(&self) -> FetchOutcome {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.is_loading {
                state.refetch_queued = true;
                false
            } else {
                state.is_loading = true;
                started = true;
                true
            }
        });
        if !started {
            debug!("leave type fetch already in flight; queued a follow-up");
            return FetchOutcome::Coalesced;
        }

        let mut guard = LoadingGuard {
            state: &self.state,
            armed: true,
        };
        loop {
            let result = self.api.list().await;
            let mut outcome = FetchOutcome::Coalesced;
            let mut again = false;
            self.state.send_modify(|state| {
                match result {
                    Ok(data) => {
                        state.version += 1;
                        info!(
                            version = state.version,
                            rows = data.len(),
                            "leave types refreshed"
                        );
                        state.data = Arc::new(data);
                        state.last_error = None;
                        outcome = FetchOutcome::Fetched {
                            version: state.version,
                        };
                    }
                    Err(err) => {
                        warn!(error = %err, version = state.version, "leave type fetch failed");
                        state.last_error = Some(err.clone());
                        outcome = FetchOutcome::Failed(err);
                    }
                }
                if state.refetch_queued {
                    state.refetch_queued = false;
                    again = true;
                } else {
                    state.is_loading = false;
                }
            });
            if !again {
                guard.disarm();
                return outcome;
            }
        }
    }

    /// Like [`request_fetch`](Self::request_fetch), but a coalesced caller
    /// also waits for the in-flight fetch and its follow-up to land, and gets
    /// their result.
    pub async fn refresh(&self) -> FetchOutcome {
        match self.request_fetch().await {
            FetchOutcome::Coalesced => {
                self.wait_idle().await;
                let state = self.snapshot();
                match state.last_error {
                    Some(err) => FetchOutcome::Failed(err),
                    None => FetchOutcome::Fetched {
                        version: state.version,
                    },
                }
            }
            outcome => outcome,
        }
    }

    /// Resolves once no fetch is in flight, including any queued follow-up.
    pub async fn wait_idle(&self) {
        let mut rx = self.state.subscribe();
        while rx.borrow_and_update().is_loading {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Clears the loading flag if a running fetch is dropped before it finishes.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<CacheState>,
    armed: bool,
}

impl LoadingGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("leave type fetch dropped before completing; clearing loading state");
        self.state.send_modify(|state| {
            state.is_loading = false;
            state.refetch_queued = false;
        });
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
