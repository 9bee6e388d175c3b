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

//! API to list employees with pagination.

use crate::driver::Driver;
use crate::rest::{EmptyBody, RestResult};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

/// Query parameters accepted by the listing API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, serde::Serialize))]
pub(crate) struct ListQuery {
    /// The 1-indexed page to return.
    page: Option<i64>,

    /// The maximum number of records to return per page.
    limit: Option<i64>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Query(query): Query<ListQuery>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let page = driver.list_employees(query.page, query.limit).await?;
    Ok(Json(page))
}
