// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    ghost_id: String,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    token: String,
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let token = state.sessions.create(body.ghost_id);
    Ok(Json(CreateSessionResponse { token }))
}
