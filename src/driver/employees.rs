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

//! Operations on the collection of employee records.

use crate::db;
use crate::driver::{Driver, DriverResult};
use crate::model::{EmployeePage, PageInfo, PageParams};

impl Driver {
    /// Gets one page of employees in insertion order together with the total record count.
    ///
    /// The raw `page` and `limit` query parameters are clamped to sane bounds; the values that
    /// were actually applied are echoed back in the result.  The page and the count are read
    /// within one transaction so they describe a consistent snapshot.
    pub(crate) async fn list_employees(
        self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> DriverResult<EmployeePage> {
        let params = PageParams::resolve(page, limit);

        let mut tx = self.db.begin().await?;
        let employees = db::list_employees(tx.ex(), *params.limit(), params.offset()).await?;
        let total = db::count_employees(tx.ex()).await?;
        tx.commit().await?;

        Ok(EmployeePage::new(employees, PageInfo::new(*params.page(), *params.limit(), total)))
    }
}
