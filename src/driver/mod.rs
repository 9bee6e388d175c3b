// Funcionarios API
// Copyright 2025 The Funcionarios API Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Business logic for the service.

use crate::db::{Db, DbError};
use crate::model::{self, EmployeeData, EmployeeId};
use std::sync::Arc;

mod employee;
mod employees;
#[cfg(test)]
mod testutils;

/// Business logic errors.  These errors encompass backend and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum DriverError {
    /// Catch-all error type for unexpected database errors.
    #[error("{0}")]
    BackendError(String),

    /// Indicates that the id in the request is not a well-formed employee id.
    #[error("{0}")]
    InvalidId(String),

    /// Indicates that one or more fields in the input data failed validation.  The individual
    /// violations are kept apart so that the caller can surface all of them.
    #[error("{}", .0.join("; "))]
    InvalidInput(Vec<String>),

    /// Indicates that a requested entry does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

/// Result type for this module.
pub(crate) type DriverResult<T> = Result<T, DriverError>;

/// Parses the raw id of a path parameter, rejecting anything that is not an integer.
fn parse_id(raw: &str) -> DriverResult<EmployeeId> {
    EmployeeId::parse(raw).map_err(|e| DriverError::InvalidId(e.to_string()))
}

/// Runs the employee validator and folds its violations into a driver error.
fn validate_input(
    name: Option<&str>,
    role: Option<&str>,
    salary: Option<f64>,
) -> DriverResult<EmployeeData> {
    model::validate_employee(name, role, salary).map_err(|violations| {
        DriverError::InvalidInput(violations.into_iter().map(|v| v.to_string()).collect())
    })
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}
