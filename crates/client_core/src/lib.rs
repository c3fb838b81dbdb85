use std::sync::Arc;

pub mod api;
pub mod cache;
pub mod dialog;
pub mod error;
pub mod page;
pub mod toast;

pub use api::{ClientBuildError, HttpLeaveTypeApi, LeaveTypeApi};
pub use cache::{CacheState, FetchOutcome, ResourceCacheStore};
pub use dialog::{DialogMode, DialogState, DialogView, LeaveTypeForm, MutationDialog};
pub use error::{FormField, RequestError, SubmitError, ValidationError};
pub use page::{LeaveTypesPage, PageView, RowView};
pub use toast::{BroadcastToastReporter, Toast, ToastKind, ToastReporter, TracingToastReporter};

/// Collaborators shared by every page and dialog of one session.
///
/// Build it once at startup and clone it into consumers; all clones point at
/// the same cache store.
#[derive(Clone)]
pub struct LeaveTypeContext {
    pub api: Arc<dyn LeaveTypeApi>,
    pub store: Arc<ResourceCacheStore>,
    pub toasts: Arc<dyn ToastReporter>,
}

impl LeaveTypeContext {
    pub fn new(api: Arc<dyn LeaveTypeApi>, toasts: Arc<dyn ToastReporter>) -> Self {
        Self {
            store: Arc::new(ResourceCacheStore::new(Arc::clone(&api))),
            api,
            toasts,
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
