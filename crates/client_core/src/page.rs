//! Leave-type list page: renders the cache, owns the dialogs, runs deletes.

use std::collections::HashMap;

use shared::domain::{LeaveType, LeaveTypeId};
use tracing::{debug, info, warn};

use crate::{
    cache::FetchOutcome, dialog::MutationDialog, error::RequestError, LeaveTypeContext,
};

const LOADING_MESSAGE: &str = "Loading leave types...";
const EMPTY_TITLE: &str = "No Leave Types Found";
const EMPTY_HINT: &str = "Get started by adding your first leave type.";
const ADD_LABEL: &str = "Add Leave Type";
const DELETE_SUCCESS: &str = "Leave type deleted successfully!";
const DELETE_FAILURE: &str = "Failed to delete leave type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: LeaveTypeId,
    pub name: String,
    pub edit_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Shown instead of the table while a fetch is in flight.
    Loading { message: &'static str },
    Empty {
        title: &'static str,
        hint: &'static str,
        add_label: &'static str,
    },
    Table { rows: Vec<RowView> },
}

pub struct LeaveTypesPage {
    ctx: LeaveTypeContext,
    add_dialog: MutationDialog,
    row_dialogs: HashMap<LeaveTypeId, MutationDialog>,
    mounted: bool,
}

impl LeaveTypesPage {
    pub fn new(ctx: LeaveTypeContext) -> Self {
        Self {
            add_dialog: MutationDialog::add(ctx.clone()),
            ctx,
            row_dialogs: HashMap::new(),
            mounted: false,
        }
    }

    /// First mount fetches when the cache has nothing to show. Later calls
    /// are no-ops and return `None`.
    pub async fn mount(&mut self) -> Option<FetchOutcome> {
        if self.mounted {
            return None;
        }
        self.mounted = true;

        let outcome = if self.ctx.store.current_view().is_empty() {
            debug!("leave type cache empty on mount; fetching");
            Some(self.ctx.store.request_fetch().await)
        } else {
            None
        };
        self.reconcile_rows();
        outcome
    }

    pub fn render(&mut self) -> PageView {
        self.reconcile_rows();

        let state = self.ctx.store.snapshot();
        if state.is_loading {
            return PageView::Loading {
                message: LOADING_MESSAGE,
            };
        }
        if state.view().is_empty() {
            return PageView::Empty {
                title: EMPTY_TITLE,
                hint: EMPTY_HINT,
                add_label: ADD_LABEL,
            };
        }

        let rows = state
            .view()
            .iter()
            .map(|leave_type| RowView {
                id: leave_type.id.clone(),
                name: leave_type.name.clone(),
                edit_open: self
                    .row_dialogs
                    .get(&leave_type.id)
                    .is_some_and(MutationDialog::is_open),
            })
            .collect();
        PageView::Table { rows }
    }

    /// The page-level add dialog, shared by the header button and the
    /// empty-state call to action.
    pub fn add_dialog(&mut self) -> &mut MutationDialog {
        &mut self.add_dialog
    }

    pub fn row_dialog(&mut self, id: &LeaveTypeId) -> Option<&mut MutationDialog> {
        self.reconcile_rows();
        self.row_dialogs.get_mut(id)
    }

    /// Deletes a row on the server, then refreshes. The row stays on screen
    /// until the refresh reports it gone.
    pub async fn delete(&self, id: &LeaveTypeId) -> Result<(), RequestError> {
        match self.ctx.api.delete(id).await {
            Ok(()) => {
                info!(%id, "leave type deleted");
                self.ctx.toasts.report_success(DELETE_SUCCESS);
                if let FetchOutcome::Failed(err) = self.ctx.store.refresh().await {
                    warn!(error = %err, "refresh after leave type delete failed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "leave type delete failed");
                self.ctx.toasts.report_error(&err.message_or(DELETE_FAILURE));
                Err(err)
            }
        }
    }

    /// Keeps exactly one edit dialog per row of the current view.
    fn reconcile_rows(&mut self) {
        let state = self.ctx.store.snapshot();
        let rows: &[LeaveType] = state.view();
        self.row_dialogs
            .retain(|id, _| rows.iter().any(|row| row.id == *id));
        for row in rows {
            match self.row_dialogs.get_mut(&row.id) {
                Some(dialog) => {
                    dialog.reseed(row);
                }
                None => {
                    self.row_dialogs
                        .insert(row.id.clone(), MutationDialog::edit(self.ctx.clone(), row));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
