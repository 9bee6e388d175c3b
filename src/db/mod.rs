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

//! Database abstraction in terms of the operations needed by the server.
//!
//! The PostgreSQL backend is for production use and the SQLite backend is
//! there to support unit tests.

use crate::model::{Employee, EmployeeData, EmployeeId, ModelError};
use async_trait::async_trait;

pub mod postgres;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Catch-all error type for unexpected database errors.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,
}

impl From<ModelError> for DbError {
    fn from(e: ModelError) -> Self {
        DbError::DataIntegrityError(e.to_string())
    }
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// A database executor that can talk to multiple database implementations.
///
/// This type provides a generic mechanism to access a typed instance of a database, which is needed
/// by sqlx to offer type safety guarantees during query compilation.  Users of this type are forced
/// to destructure it and issue different calls for each database.
///
/// Note that this can wrap an executor that talks directly to a pool or to an open transaction.
pub enum Executor {
    /// A PostgreSQL executor that can be used in `sqlx` operations.
    Postgres(postgres::PostgresExecutor),

    /// A SQLite executor that can be used in `sqlx` operations.
    #[cfg(test)]
    Sqlite(sqlite::SqliteExecutor),
}

/// A wrapper for a database executor backed by an open transaction.
pub struct TxExecutor(Executor);

impl TxExecutor {
    /// Returns the executor wrapped by this transaction.
    ///
    /// This would be better called `executor` but this method is used so frequently that it makes
    /// call sites too verbose.
    pub fn ex(&mut self) -> &mut Executor {
        &mut self.0
    }

    /// Commits the transaction.
    pub async fn commit(self) -> DbResult<()> {
        match self.0 {
            Executor::Postgres(e) => e.commit().await,

            #[cfg(test)]
            Executor::Sqlite(e) => e.commit().await,
        }
    }
}

/// Abstraction over the database connection.
#[async_trait]
pub trait Db {
    /// Obtains an executor for direct access to the pool.
    ///
    /// This would be better called `executor` but this method is used so frequently that it makes
    /// call sites too verbose.
    async fn ex(&self) -> DbResult<Executor>;

    /// Begins a transaction.
    ///
    /// It is the responsibility of the caller to call `commit` on the returned executor.  Otherwise
    /// the transaction is rolled back on drop.
    async fn begin(&self) -> DbResult<TxExecutor>;

    /// Closes the connection pool, failing any operation still waiting on it.
    async fn close(&self);
}

/// Initializes the `funcionarios` table in the database accessed by `ex`.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => postgres::init_schema(ex).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::init_schema(ex).await,
    }
}

/// Inserts a new employee built from the validated `data` and returns the id the datastore
/// assigned to it.
pub(crate) async fn create_employee(
    ex: &mut Executor,
    data: &EmployeeData,
) -> DbResult<EmployeeId> {
    match ex {
        Executor::Postgres(ex) => postgres::create_employee(ex, data).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::create_employee(ex, data).await,
    }
}

/// Gets the employee identified by `id`.
pub(crate) async fn get_employee(ex: &mut Executor, id: EmployeeId) -> DbResult<Employee> {
    match ex {
        Executor::Postgres(ex) => postgres::get_employee(ex, id).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::get_employee(ex, id).await,
    }
}

/// Gets a window of `limit` employees in insertion order, skipping the first `offset` records.
pub(crate) async fn list_employees(
    ex: &mut Executor,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Employee>> {
    match ex {
        Executor::Postgres(ex) => postgres::list_employees(ex, limit, offset).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::list_employees(ex, limit, offset).await,
    }
}

/// Counts all persisted employees, independently of any pagination window.
pub(crate) async fn count_employees(ex: &mut Executor) -> DbResult<i64> {
    match ex {
        Executor::Postgres(ex) => postgres::count_employees(ex).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::count_employees(ex).await,
    }
}

/// Replaces the writable fields of the employee identified by `id` with the validated `data`.
///
/// The number of affected rows detects a missing record without a prior existence check: zero
/// affected rows yields `DbError::NotFound`.
pub(crate) async fn update_employee(
    ex: &mut Executor,
    id: EmployeeId,
    data: &EmployeeData,
) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => postgres::update_employee(ex, id, data).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::update_employee(ex, id, data).await,
    }
}

/// Deletes the employee identified by `id`, failing with `DbError::NotFound` if the deletion
/// affected zero rows.
pub(crate) async fn delete_employee(ex: &mut Executor, id: EmployeeId) -> DbResult<()> {
    match ex {
        Executor::Postgres(ex) => postgres::delete_employee(ex, id).await,

        #[cfg(test)]
        Executor::Sqlite(ex) => sqlite::delete_employee(ex, id).await,
    }
}
