// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use ghostpir_engine::PirEngine;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct KpirRequest {
    token: String,
    // Deserialized wide so an out-of-range value (e.g. 300) is a value this
    // handler can reject with a specific RequestSemantics message, rather
    // than serde_json failing the whole body as malformed shape.
    vectors: Vec<Vec<i64>>,
    chunk_index: i64,
}

#[derive(Serialize)]
pub struct KpirResponse {
    responses: Vec<Vec<u8>>,
}

/// Reject any byte outside `[0, 255]` before the vectors ever reach the
/// engine, per the "non-byte numerics" precondition.
fn to_byte_vectors(vectors: &[Vec<i64>]) -> Result<Vec<Vec<u8>>, ApiError> {
    vectors
        .iter()
        .map(|v| {
            v.iter()
                .map(|&b| {
                    u8::try_from(b).map_err(|_| {
                        ApiError::RequestSemantics(format!("byte {b} out of range"))
                    })
                })
                .collect()
        })
        .collect()
}

/// Validate the session first (401 takes priority over any property of the
/// vectors themselves), then the byte range of every vector, then let the
/// engine enforce cache-non-empty / vector-count / vector-length in that
/// order.
pub async fn kpir(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<KpirRequest>,
) -> Result<Json<KpirResponse>, ApiError> {
    if !state.sessions.validate(&body.token) {
        return Err(ApiError::SessionInvalid);
    }

    let vectors = to_byte_vectors(&body.vectors)?;

    let snapshot = state.cache.snapshot();
    let mut engine = PirEngine::new(snapshot);
    if state.config.strict_single_vector {
        engine = engine.with_max_vectors_per_request(1);
    }
    let responses = engine.compute(&vectors, body.chunk_index)?;

    Ok(Json(KpirResponse { responses }))
}
