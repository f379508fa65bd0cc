// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! A single `log`-based request-logging layer. Deliberately not CORS or
//! IP-truncation middleware — both stay out of scope per the boundary-layer
//! contract this crate implements.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    log::info!("{method} {path} -> {}", response.status());
    response
}
