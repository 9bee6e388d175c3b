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

//! API to delete one employee by id.

use crate::driver::Driver;
use crate::model::EmployeeId;
use crate::rest::{EmptyBody, RestResult};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// Acknowledgment returned after a successful deletion.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize, PartialEq))]
pub(crate) struct DeleteResponse {
    /// Always true; failures are reported through the error body instead.
    success: bool,

    /// Human-readable confirmation of the deletion.
    message: String,

    /// The id of the record that was deleted.
    id: EmployeeId,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let id = driver.delete_employee(&id).await?;

    let response = DeleteResponse {
        success: true,
        message: "Employee removed successfully".to_owned(),
        id,
    };
    Ok(Json(response))
}
