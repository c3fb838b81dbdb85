use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id_newtype!(LeaveTypeId);

/// A named leave category as stored by the server.
///
/// Ids are assigned by the server on create and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub name: String,
}

impl LeaveType {
    pub fn new(id: impl Into<LeaveTypeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Rejects records the server should never produce: blank ids or names.
    pub fn check_well_formed(&self) -> Result<(), RecordError> {
        if self.id.as_str().trim().is_empty() {
            return Err(RecordError::MissingId);
        }
        if self.name.trim().is_empty() {
            return Err(RecordError::BlankName {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

impl From<String> for LeaveTypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
