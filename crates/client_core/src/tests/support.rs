use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::domain::{LeaveType, LeaveTypeId};
use tokio::sync::Semaphore;

use crate::{
    api::LeaveTypeApi,
    error::RequestError,
    toast::{Toast, ToastKind, ToastReporter},
    LeaveTypeContext,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Create { name: String },
    Update { id: LeaveTypeId, name: String },
    Delete { id: LeaveTypeId },
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Update,
    Delete,
    List,
}

#[derive(Default)]
struct FakeState {
    rows: Vec<LeaveType>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: HashMap<Op, RequestError>,
    list_gate: Option<Arc<Semaphore>>,
    lists_started: usize,
}

/// In-memory stand-in for the leave-type server.
#[derive(Default)]
pub struct FakeLeaveTypeApi {
    state: Mutex<FakeState>,
}

impl FakeLeaveTypeApi {
    pub fn with_rows(rows: Vec<LeaveType>) -> Arc<Self> {
        let next_id = rows.len() as u64;
        let fake = Self::default();
        {
            let mut state = fake.state.lock().expect("fake state");
            state.rows = rows;
            state.next_id = next_id;
        }
        Arc::new(fake)
    }

    pub fn empty() -> Arc<Self> {
        Self::with_rows(Vec::new())
    }

    pub fn fail(&self, op: Op, err: RequestError) {
        self.state
            .lock()
            .expect("fake state")
            .failures
            .insert(op, err);
    }

    pub fn clear_failures(&self) {
        self.state.lock().expect("fake state").failures.clear();
    }

    /// Makes every later `list` wait for a matching `release_list`.
    pub fn gate_lists(&self) {
        self.state.lock().expect("fake state").list_gate = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_list(&self) {
        if let Some(gate) = &self.state.lock().expect("fake state").list_gate {
            gate.add_permits(1);
        }
    }

    /// Yields until `n` list calls have started, gated or not.
    pub async fn wait_for_lists_started(&self, n: usize) {
        while self.lists_started() < n {
            tokio::task::yield_now().await;
        }
    }

    pub fn lists_started(&self) -> usize {
        self.state.lock().expect("fake state").lists_started
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().expect("fake state").calls.clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(
                    (op, call),
                    (Op::Create, ApiCall::Create { .. })
                        | (Op::Update, ApiCall::Update { .. })
                        | (Op::Delete, ApiCall::Delete { .. })
                        | (Op::List, ApiCall::List)
                )
            })
            .count()
    }

    pub fn set_rows(&self, rows: Vec<LeaveType>) {
        self.state.lock().expect("fake state").rows = rows;
    }

    fn record(&self, op: Op, call: ApiCall) -> Result<(), RequestError> {
        let mut state = self.state.lock().expect("fake state");
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LeaveTypeApi for FakeLeaveTypeApi {
    async fn create(&self, name: &str) -> Result<LeaveType, RequestError> {
        self.record(
            Op::Create,
            ApiCall::Create {
                name: name.to_string(),
            },
        )?;
        let mut state = self.state.lock().expect("fake state");
        state.next_id += 1;
        let created = LeaveType::new(state.next_id.to_string(), name);
        state.rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &LeaveTypeId, name: &str) -> Result<LeaveType, RequestError> {
        self.record(
            Op::Update,
            ApiCall::Update {
                id: id.clone(),
                name: name.to_string(),
            },
        )?;
        let mut state = self.state.lock().expect("fake state");
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == *id)
            .ok_or_else(|| RequestError::status(404, Some("Leave type not found".to_string())))?;
        row.name = name.to_string();
        Ok(row.clone())
    }

    async fn delete(&self, id: &LeaveTypeId) -> Result<(), RequestError> {
        self.record(Op::Delete, ApiCall::Delete { id: id.clone() })?;
        self.state
            .lock()
            .expect("fake state")
            .rows
            .retain(|row| row.id != *id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LeaveType>, RequestError> {
        let gate = {
            let mut state = self.state.lock().expect("fake state");
            state.lists_started += 1;
            state.list_gate.clone()
        };
        if let Some(gate) = gate {
            gate.acquire().await.expect("list gate").forget();
        }
        self.record(Op::List, ApiCall::List)?;
        Ok(self.state.lock().expect("fake state").rows.clone())
    }
}

#[derive(Default)]
pub struct RecordingToasts {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingToasts {
    pub fn all(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toasts").clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.all().pop()
    }

    fn push(&self, kind: ToastKind, message: &str) {
        self.toasts.lock().expect("toasts").push(Toast {
            kind,
            message: message.to_string(),
        });
    }
}

impl ToastReporter for RecordingToasts {
    fn report_success(&self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn report_error(&self, message: &str) {
        self.push(ToastKind::Error, message);
    }
}

pub fn context(api: &Arc<FakeLeaveTypeApi>) -> (LeaveTypeContext, Arc<RecordingToasts>) {
    let toasts = Arc::new(RecordingToasts::default());
    let ctx = LeaveTypeContext::new(
        Arc::clone(api) as Arc<dyn LeaveTypeApi>,
        Arc::clone(&toasts) as Arc<dyn ToastReporter>,
    );
    (ctx, toasts)
}

pub fn success(message: &str) -> Toast {
    Toast {
        kind: ToastKind::Success,
        message: message.to_string(),
    }
}

pub fn error(message: &str) -> Toast {
    Toast {
        kind: ToastKind::Error,
        message: message.to_string(),
    }
}
