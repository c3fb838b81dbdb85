use serde::{Deserialize, Serialize};

use crate::{domain::LeaveType, error::RecordError};

/// Body of `GET /leave-types`: the complete collection as of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSnapshot {
    pub data: Vec<LeaveType>,
}

impl FetchSnapshot {
    pub fn new(data: Vec<LeaveType>) -> Self {
        Self { data }
    }

    pub fn check_well_formed(&self) -> Result<(), RecordError> {
        self.data.iter().try_for_each(LeaveType::check_well_formed)
    }
}

/// Body of `POST /leave-types` and `PUT /leave-types/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeRequest {
    pub name: String,
}
