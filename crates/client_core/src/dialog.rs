//! Add/edit dialog for a single leave type.

use shared::domain::{LeaveType, LeaveTypeId};
use tracing::{debug, info, warn};

use crate::{
    cache::FetchOutcome,
    error::{FormField, RequestError, SubmitError, ValidationError},
    LeaveTypeContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Edit,
}

impl DialogMode {
    pub fn verb(self) -> &'static str {
        match self {
            DialogMode::Add => "add",
            DialogMode::Edit => "edit",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DialogMode::Add => "Add New Leave Type",
            DialogMode::Edit => "Edit Leave Type",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            DialogMode::Add => "Add Leave Type",
            DialogMode::Edit => "Save Changes",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            DialogMode::Add => "Leave type added successfully!",
            DialogMode::Edit => "Leave type updated successfully!",
        }
    }

    fn failure_fallback(self) -> String {
        format!("Failed to {} leave type. Please try again.", self.verb())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveTypeForm {
    pub name: String,
}

impl LeaveTypeForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Observable state of one dialog instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogState {
    pub is_open: bool,
    pub mode: DialogMode,
    pub form: LeaveTypeForm,
    pub target_id: Option<LeaveTypeId>,
    pub field_error: Option<ValidationError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub is_open: bool,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub name_label: &'static str,
    pub name_placeholder: &'static str,
    pub name: String,
    pub name_error: Option<String>,
}

enum Binding {
    Create,
    Update(LeaveTypeId),
}

/// Collects one name, validates it and runs exactly one create or update.
///
/// `submit` holds `&mut self` until the request and the follow-up refresh
/// finish, so the same dialog cannot be submitted twice concurrently.
pub struct MutationDialog {
    ctx: LeaveTypeContext,
    binding: Binding,
    defaults: LeaveTypeForm,
    form: LeaveTypeForm,
    is_open: bool,
    field_error: Option<ValidationError>,
}

impl MutationDialog {
    pub fn add(ctx: LeaveTypeContext) -> Self {
        Self::with_binding(ctx, Binding::Create, LeaveTypeForm::default())
    }

    pub fn edit(ctx: LeaveTypeContext, target: &LeaveType) -> Self {
        Self::with_binding(
            ctx,
            Binding::Update(target.id.clone()),
            LeaveTypeForm::new(target.name.clone()),
        )
    }

    fn with_binding(ctx: LeaveTypeContext, binding: Binding, defaults: LeaveTypeForm) -> Self {
        Self {
            ctx,
            binding,
            form: defaults.clone(),
            defaults,
            is_open: false,
            field_error: None,
        }
    }

    pub fn mode(&self) -> DialogMode {
        match self.binding {
            Binding::Create => DialogMode::Add,
            Binding::Update(_) => DialogMode::Edit,
        }
    }

    pub fn target_id(&self) -> Option<&LeaveTypeId> {
        match &self.binding {
            Binding::Create => None,
            Binding::Update(id) => Some(id),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn form(&self) -> &LeaveTypeForm {
        &self.form
    }

    pub fn field_error(&self) -> Option<&ValidationError> {
        self.field_error.as_ref()
    }

    pub fn state(&self) -> DialogState {
        DialogState {
            is_open: self.is_open,
            mode: self.mode(),
            form: self.form.clone(),
            target_id: self.target_id().cloned(),
            field_error: self.field_error.clone(),
        }
    }

    pub fn view(&self) -> DialogView {
        let mode = self.mode();
        DialogView {
            is_open: self.is_open,
            title: mode.title(),
            submit_label: mode.submit_label(),
            name_label: FormField::Name.label(),
            name_placeholder: "Enter leave type name",
            name: self.form.name.clone(),
            name_error: self.field_error.as_ref().map(|err| err.message.clone()),
        }
    }

    pub fn open(&mut self) {
        if !self.is_open {
            debug!(mode = self.mode().verb(), "leave type dialog opened");
            self.is_open = true;
        }
    }

    /// Closes the dialog and drops anything typed since it was opened.
    pub fn cancel(&mut self) {
        self.is_open = false;
        self.reset_form();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
        self.field_error = None;
    }

    /// Replaces the defaults of a closed edit dialog with the server's row.
    ///
    /// Returns whether anything changed. Open dialogs keep what the user typed.
    pub fn reseed(&mut self, row: &LeaveType) -> bool {
        let Binding::Update(id) = &self.binding else {
            return false;
        };
        if *id != row.id || self.is_open || self.defaults.name == row.name {
            return false;
        }
        self.defaults = LeaveTypeForm::new(row.name.clone());
        self.reset_form();
        true
    }

    /// Returns the name to send: the trimmed input, which must not be empty.
    pub fn validate(form: &LeaveTypeForm) -> Result<String, ValidationError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(ValidationError::name_required());
        }
        Ok(name.to_string())
    }

    pub async fn submit(&mut self) -> Result<LeaveType, SubmitError> {
        if !self.is_open {
            return Err(SubmitError::NotOpen);
        }

        let mode = self.mode();
        let name = match Self::validate(&self.form) {
            Ok(name) => name,
            Err(err) => {
                debug!(mode = mode.verb(), error = %err, "leave type form rejected");
                self.field_error = Some(err.clone());
                return Err(err.into());
            }
        };
        self.field_error = None;

        let result = match &self.binding {
            Binding::Create => self.ctx.api.create(&name).await,
            Binding::Update(id) => self.ctx.api.update(id, &name).await,
        };

        match result {
            Ok(saved) => {
                info!(mode = mode.verb(), id = %saved.id, "leave type saved");
                self.ctx.toasts.report_success(mode.success_message());
                if let FetchOutcome::Failed(err) = self.ctx.store.refresh().await {
                    warn!(error = %err, "refresh after leave type save failed");
                }
                self.is_open = false;
                self.reset_form();
                Ok(saved)
            }
            Err(err) => Err(self.report_failure(mode, err).into()),
        }
    }

    fn report_failure(&self, mode: DialogMode, err: RequestError) -> RequestError {
        warn!(mode = mode.verb(), error = %err, "leave type save failed");
        self.ctx
            .toasts
            .report_error(&err.message_or(&mode.failure_fallback()));
        err
    }

    fn reset_form(&mut self) {
        self.form = self.defaults.clone();
        self.field_error = None;
    }
}

#[cfg(test)]
#[path = "tests/dialog_tests.rs"]
mod tests;
