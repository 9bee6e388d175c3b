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

//! Operations on one employee record.

use crate::db;
use crate::driver::{parse_id, validate_input, Driver, DriverResult};
use crate::model::{Employee, EmployeeId};

impl Driver {
    /// Validates the writable fields and persists a new employee, returning the stored record
    /// with its datastore-assigned id.
    pub(crate) async fn create_employee(
        self,
        name: Option<String>,
        role: Option<String>,
        salary: Option<f64>,
    ) -> DriverResult<Employee> {
        let data = validate_input(name.as_deref(), role.as_deref(), salary)?;
        let id = db::create_employee(&mut self.db.ex().await?, &data).await?;
        Ok(data.into_employee(id))
    }

    /// Gets the employee identified by the raw id `raw_id`.
    pub(crate) async fn get_employee(self, raw_id: &str) -> DriverResult<Employee> {
        let id = parse_id(raw_id)?;
        let employee = db::get_employee(&mut self.db.ex().await?, id).await?;
        Ok(employee)
    }

    /// Validates the writable fields and replaces the employee identified by the raw id
    /// `raw_id`, returning the updated record.
    ///
    /// The write and the re-read share one transaction so the caller gets the state it wrote.
    pub(crate) async fn update_employee(
        self,
        raw_id: &str,
        name: Option<String>,
        role: Option<String>,
        salary: Option<f64>,
    ) -> DriverResult<Employee> {
        let id = parse_id(raw_id)?;
        let data = validate_input(name.as_deref(), role.as_deref(), salary)?;

        let mut tx = self.db.begin().await?;
        db::update_employee(tx.ex(), id, &data).await?;
        let employee = db::get_employee(tx.ex(), id).await?;
        tx.commit().await?;
        Ok(employee)
    }

    /// Deletes the employee identified by the raw id `raw_id`, returning the deleted id.
    pub(crate) async fn delete_employee(self, raw_id: &str) -> DriverResult<EmployeeId> {
        let id = parse_id(raw_id)?;
        db::delete_employee(&mut self.db.ex().await?, id).await?;
        Ok(id)
    }
}
