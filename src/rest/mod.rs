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

//! Entry point to the REST server.
//!
//! Every API is put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.

use crate::driver::{Driver, DriverError};
use async_trait::async_trait;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::response::IntoResponse;
use axum::{Json, Router};
use log::warn;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

mod employee_delete;
mod employee_get;
mod employee_put;
mod employees_get;
mod employees_post;
mod status_get;
#[cfg(test)]
pub(crate) mod testutils;

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates that the id in the request path is not a well-formed employee id.
    #[error("{0}")]
    InvalidId(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates that one or more fields in the request payload failed validation.
    #[error("{}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidId(_) => RestError::InvalidId(e.to_string()),
            DriverError::InvalidInput(violations) => RestError::ValidationFailed(violations),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            RestError::InternalError(_) => {
                (http::StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            RestError::InvalidId(_) => (http::StatusCode::BAD_REQUEST, "invalid_id"),
            RestError::NotFound(_) => (http::StatusCode::NOT_FOUND, "not_found"),
            RestError::PayloadNotEmpty => {
                (http::StatusCode::PAYLOAD_TOO_LARGE, "payload_not_empty")
            }
            RestError::ValidationFailed(_) => (http::StatusCode::BAD_REQUEST, "validation_error"),
        };

        let message = match &self {
            RestError::InternalError(message) => {
                // The raw message can leak backend internals, so it only goes to the log in
                // release builds.
                warn!("Internal error in request: {}", message);
                if cfg!(debug_assertions) {
                    message.clone()
                } else {
                    "Internal server error".to_owned()
                }
            }
            _ => self.to_string(),
        };

        let errors = match self {
            RestError::ValidationFailed(violations) => Some(violations),
            _ => None,
        };

        let response = ErrorResponse { code: code.to_owned(), message, errors };

        (status, Json(response)).into_response()
    }
}

/// Result type for this module.
pub(crate) type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    /// Machine-readable indicator of the kind of error.
    pub(crate) code: String,

    /// Textual representation of the error message.
    pub(crate) message: String,

    /// Individual violations of a failed validation, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<Vec<String>>,
}

/// Request payload carrying the writable fields of an employee.
///
/// Every field is optional at the wire level so that missing fields reach the validator and
/// all violations can be surfaced together instead of failing at deserialization time.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Default, Serialize))]
pub(crate) struct EmployeeRequest {
    /// The employee's full name.
    pub(crate) name: Option<String>,

    /// The employee's job title.
    pub(crate) role: Option<String>,

    /// The employee's monthly salary.
    pub(crate) salary: Option<f64>,
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub(crate) struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/", get(status_get::handler))
        .route(
            "/funcionarios",
            get(employees_get::handler).post(employees_post::handler),
        )
        .route(
            "/funcionarios/:id",
            get(employee_get::handler)
                .put(employee_put::handler)
                .delete(employee_delete::handler),
        )
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
