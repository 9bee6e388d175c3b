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

//! REST service to manage employee records.
//!
//! The service is structured as a stack of layers: `model` provides the domain
//! data types and their validation rules; `db` is the persistence layer over a
//! relational `funcionarios` table; `driver` holds the business logic for the
//! CRUD operations; and `rest` exposes those operations as HTTP APIs.  Errors
//! have a distinct type per layer and float to the top with the `?` operator,
//! where the REST layer translates them to status codes.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::{info, warn};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod db;
use db::Db;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod env;
pub(crate) mod model;
mod rest;
use rest::app;

/// Completes when the process receives an interrupt request.
async fn wait_for_shutdown() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received; shutting down"),
        Err(e) => {
            warn!("Cannot wait for the interrupt signal: {}", e);
            futures::future::pending::<()>().await;
        }
    }
}

/// Instantiates all resources to serve the application on `bind_addr` against
/// an already-connected `db`, and closes the database on shutdown.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Box<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let db: Arc<dyn Db + Send + Sync> = Arc::from(db);
    let driver = Driver::new(db.clone());
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    axum::serve(listener, app).with_graceful_shutdown(wait_for_shutdown()).await?;

    db.close().await;
    Ok(())
}
