// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct IntegrityQuery {
    module_id: i64,
    chunk_index: i64,
}

#[derive(Serialize)]
pub struct IntegrityResponse {
    hash: String,
}

pub async fn integrity(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IntegrityQuery>,
) -> Result<Json<IntegrityResponse>, ApiError> {
    let snapshot = state.cache.snapshot();
    let hash = ghostpir_engine::chunk_hash(&snapshot, q.module_id, q.chunk_index)?;
    Ok(Json(IntegrityResponse { hash }))
}
