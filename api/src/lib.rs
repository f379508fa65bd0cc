// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! The HTTP boundary layer: wires the catalog, storage, session, and engine
//! crates to an `axum::Router`. No business logic lives here beyond request
//! parsing, admin-secret checks, and status-code mapping — everything else
//! delegates to the library crates this binds together.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

pub use state::AppState;

/// Build the full router: every route in the external-interface table, plus
/// the request-logging middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/session", post(handlers::session::create_session))
        .route("/catalog", get(handlers::catalog::list_catalog))
        .route("/kpir", post(handlers::kpir::kpir))
        .route("/integrity", get(handlers::integrity::integrity))
        .route("/quiz/:module_id", get(handlers::quiz::list_quiz))
        .route("/admin/upload", post(handlers::admin::upload))
        .route("/admin/modules/:id", delete(handlers::admin::delete_module))
        .route("/admin/quiz", post(handlers::admin::add_quiz))
        .route("/admin/quiz/:id", delete(handlers::admin::delete_quiz))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
