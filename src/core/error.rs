//! Error types for the record store and the session gate.
//!
//! Every variant is recoverable: the front end reports it inline and the
//! session carries on with its tables intact.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::session::{Role, View};

/// Which in-memory table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableName {
    Deals,
    Prospects,
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableName::Deals => f.write_str("deals"),
            TableName::Prospects => f.write_str("prospects"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("No record keyed {key:?} in {table}")]
    NotFound { table: TableName, key: String },

    #[error("A record keyed {key:?} already exists in {table}")]
    DuplicateKey { table: TableName, key: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl StoreError {
    pub(crate) fn not_found(table: TableName, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            table,
            key: key.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Identity required")]
    NotAuthenticated,

    #[error("{role} identity cannot open {view}")]
    AccessDenied { role: Role, view: View },

    #[error(transparent)]
    Store(#[from] StoreError),
}
