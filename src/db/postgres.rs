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

//! Implementation of the database abstraction using PostgreSQL.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use crate::env::{get_optional_var, get_required_var};
use crate::model::{Employee, EmployeeData, EmployeeId, EmployeeName, Role, Salary};
use async_trait::async_trait;
use futures::TryStreamExt;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPool, PgPoolOptions, PgRow, Postgres};
use sqlx::{PgConnection, Row, Transaction};
use std::fmt;
use std::time::Duration;

/// Schema to use to initialize the production database.
const SCHEMA: &str = include_str!("postgres.sql");

/// Maximum number of connections to keep open when the options do not say otherwise.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long an operation waits for a connection before failing with `DbError::Unavailable`.
///
/// A bounded wait keeps pool exhaustion from hanging in-flight requests.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::Database(e) => match e.downcast_ref::<PgDatabaseError>().code() {
            "53300" /* too_many_connections */ => DbError::Unavailable,
            number => DbError::BackendError(format!("pgsql error {}: {}", number, e)),
        },
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Options to establish a connection to a PostgreSQL database.
#[cfg_attr(test, derive(PartialEq))]
pub struct PostgresOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to (typically 5432).
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.
    pub password: String,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: Option<u32>,

    /// Maximum number of connections to allow against the database.
    pub max_connections: Option<u32>,
}

impl fmt::Debug for PostgresOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresOptions")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"scrubbed")
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_NAME`,
    /// `<prefix>_USER`, `<prefix>_PASSWORD`, `<prefix>_MIN_CONNECTIONS` and
    /// `<prefix>_MAX_CONNECTIONS`.  All of them have defaults except for the password.
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        Ok(PostgresOptions {
            host: get_optional_var::<String>(prefix, "HOST")?
                .unwrap_or_else(|| "localhost".to_owned()),
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(5432),
            database: get_optional_var::<String>(prefix, "NAME")?
                .unwrap_or_else(|| "empresa".to_owned()),
            username: get_optional_var::<String>(prefix, "USER")?
                .unwrap_or_else(|| "postgres".to_owned()),
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
        })
    }
}

/// A generic database executor implementation for PostgreSQL.
#[derive(Debug)]
pub enum PostgresExecutor {
    /// An executor backed by a connection.
    PoolExec(PoolConnection<Postgres>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Postgres>),
}

impl PostgresExecutor {
    /// Returns the raw connection this executor runs queries on.
    fn conn(&mut self) -> &mut PgConnection {
        match self {
            PostgresExecutor::PoolExec(conn) => &mut **conn,
            PostgresExecutor::TxExec(tx) => &mut **tx,
        }
    }

    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            PostgresExecutor::PoolExec(_) => unreachable!("Do not call commit on direct executors"),
            PostgresExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }
}

/// Shareable connection to a PostgreSQL database.
pub struct PostgresDb {
    /// Shared PostgreSQL connection pool.  This is a cloneable type that all concurrent
    /// transactions can use concurrently.
    pool: PgPool,
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            if cfg!(debug_assertions) {
                panic!("Dropping connection without having called close() first");
            } else {
                warn!("Dropping connection without having called close() first");
            }
        }
    }
}

impl PostgresDb {
    /// Creates a new connection based on a set of options.
    ///
    /// Note that this does *not* establish the connection.
    pub fn connect(opts: PostgresOptions) -> DbResult<Self> {
        let mut pool_options = PgPoolOptions::new()
            .max_connections(opts.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
            .acquire_timeout(ACQUIRE_TIMEOUT);
        if let Some(min_connections) = opts.min_connections {
            pool_options = pool_options.min_connections(min_connections);
        }

        let options = PgConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password);

        let pool = pool_options.connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<PostgresExecutor> {
        let conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        Ok(PostgresExecutor::PoolExec(conn))
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        let ex = self.typed_ex().await?;
        Ok(Executor::Postgres(ex))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(TxExecutor(Executor::Postgres(PostgresExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Initializes the schema of the database accessed by `ex`.
pub(super) async fn init_schema(ex: &mut PostgresExecutor) -> DbResult<()> {
    for query_str in SCHEMA.split(';') {
        let query_str = query_str.trim();
        if query_str.is_empty() {
            continue;
        }
        sqlx::query(query_str).execute(ex.conn()).await.map_err(map_sqlx_error)?;
    }
    Ok(())
}

/// Converts one row of the `funcionarios` table into an `Employee`.
fn employee_from_row(row: &PgRow) -> DbResult<Employee> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let nome: String = row.try_get("nome").map_err(map_sqlx_error)?;
    let cargo: String = row.try_get("cargo").map_err(map_sqlx_error)?;
    let salario: f64 = row.try_get("salario").map_err(map_sqlx_error)?;

    Ok(Employee::new(
        EmployeeId::new(id)?,
        EmployeeName::new(nome)?,
        Role::new(cargo)?,
        Salary::new(salario)?,
    ))
}

/// Inserts a new employee and returns the id the database assigned to it.
pub(super) async fn create_employee(
    ex: &mut PostgresExecutor,
    data: &EmployeeData,
) -> DbResult<EmployeeId> {
    let query_str = "
        INSERT INTO funcionarios (nome, cargo, salario)
        VALUES ($1, $2, $3)
        RETURNING id
    ";
    let row = sqlx::query(query_str)
        .bind(data.name().as_str())
        .bind(data.role().as_str())
        .bind(data.salary().as_f64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    Ok(EmployeeId::new(id)?)
}

/// Gets the employee identified by `id`.
pub(super) async fn get_employee(ex: &mut PostgresExecutor, id: EmployeeId) -> DbResult<Employee> {
    let query_str = "SELECT id, nome, cargo, salario FROM funcionarios WHERE id = $1";
    let row = sqlx::query(query_str)
        .bind(id.as_i64())
        .fetch_one(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    employee_from_row(&row)
}

/// Gets a window of `limit` employees in insertion order, skipping the first `offset` records.
pub(super) async fn list_employees(
    ex: &mut PostgresExecutor,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<Employee>> {
    let query_str = "
        SELECT id, nome, cargo, salario FROM funcionarios
        ORDER BY id
        LIMIT $1 OFFSET $2
    ";
    let mut rows = sqlx::query(query_str).bind(limit).bind(offset).fetch(ex.conn());

    let mut employees = vec![];
    while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
        employees.push(employee_from_row(&row)?);
    }
    Ok(employees)
}

/// Counts all persisted employees.
pub(super) async fn count_employees(ex: &mut PostgresExecutor) -> DbResult<i64> {
    let query_str = "SELECT COUNT(*) AS total FROM funcionarios";
    let row = sqlx::query(query_str).fetch_one(ex.conn()).await.map_err(map_sqlx_error)?;
    row.try_get("total").map_err(map_sqlx_error)
}

/// Replaces the writable fields of the employee identified by `id` with `data`.
pub(super) async fn update_employee(
    ex: &mut PostgresExecutor,
    id: EmployeeId,
    data: &EmployeeData,
) -> DbResult<()> {
    let query_str = "UPDATE funcionarios SET nome = $1, cargo = $2, salario = $3 WHERE id = $4";
    let done = sqlx::query(query_str)
        .bind(data.name().as_str())
        .bind(data.role().as_str())
        .bind(data.salary().as_f64())
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound);
    } else if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Update affected more than one row".to_owned()));
    }
    Ok(())
}

/// Deletes the employee identified by `id`.
pub(super) async fn delete_employee(ex: &mut PostgresExecutor, id: EmployeeId) -> DbResult<()> {
    let query_str = "DELETE FROM funcionarios WHERE id = $1";
    let done = sqlx::query(query_str)
        .bind(id.as_i64())
        .execute(ex.conn())
        .await
        .map_err(map_sqlx_error)?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound);
    } else if done.rows_affected() != 1 {
        return Err(DbError::BackendError("Deletion affected more than one row".to_owned()));
    }
    Ok(())
}
