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

//! Test utilities for the business layer.

use crate::db::{self, Db};
use crate::driver::Driver;
use crate::model::{validate_employee, Employee, EmployeeId};
use std::sync::Arc;

/// State of a test scenario backed by an in-memory database.
pub(crate) struct TestContext {
    /// The database the driver under test talks to.
    db: Arc<dyn Db + Send + Sync>,
}

impl TestContext {
    /// Initializes a context with an empty employees table.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::from(db::sqlite::testutils::setup().await);
        Self { db }
    }

    /// Returns a driver for the context's database.
    pub(crate) fn driver(&self) -> Driver {
        Driver::new(self.db.clone())
    }

    /// Inserts an employee directly into the database, bypassing the driver under test.
    pub(crate) async fn insert_employee(&self, name: &str, role: &str, salary: f64) -> EmployeeId {
        let data = validate_employee(Some(name), Some(role), Some(salary)).unwrap();
        db::create_employee(&mut self.db.ex().await.unwrap(), &data).await.unwrap()
    }

    /// Gets an employee directly from the database, bypassing the driver under test.
    pub(crate) async fn get_employee(&self, id: i64) -> Employee {
        let id = EmployeeId::new(id).unwrap();
        db::get_employee(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    /// Counts the persisted employees directly in the database.
    pub(crate) async fn count_employees(&self) -> i64 {
        db::count_employees(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}
