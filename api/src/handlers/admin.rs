// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Admin-gated mutations: upload, delete module, add/delete quiz question.
//! Every handler here checks the shared secret before touching state.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use ghostpir_catalog::ModuleFilter;
use ghostpir_storage::ingest;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::handlers::catalog::{loaded_modules, ModuleView};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AdminKeyBody {
    admin_key: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct UploadResponse {
    status: &'static str,
    module_id: i64,
    modules: Vec<ModuleView>,
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut admin_key: Option<String> = None;
    let mut title: Option<String> = None;
    let mut topic: Option<String> = None;
    let mut tier: Option<i64> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::RequestShape)?
    {
        match field.name().unwrap_or("") {
            "admin_key" => {
                admin_key = Some(field.text().await.map_err(|_| ApiError::RequestShape)?);
            }
            "title" => {
                title = Some(field.text().await.map_err(|_| ApiError::RequestShape)?);
            }
            "topic" => {
                topic = Some(field.text().await.map_err(|_| ApiError::RequestShape)?);
            }
            "tier" => {
                let raw = field.text().await.map_err(|_| ApiError::RequestShape)?;
                tier = Some(
                    raw.parse()
                        .map_err(|_| ApiError::RequestSemantics("tier must be an integer".into()))?,
                );
            }
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| ApiError::RequestShape)?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    let admin_key = admin_key.ok_or(ApiError::RequestShape)?;
    if !state.admin_key_matches(&admin_key) {
        return Err(ApiError::AuthMissing);
    }

    let title = title.ok_or(ApiError::RequestShape)?;
    let topic = topic.ok_or(ApiError::RequestShape)?;
    let tier = tier.ok_or(ApiError::RequestShape)?;
    let file_bytes = file_bytes.ok_or(ApiError::RequestShape)?;
    let file_name = file_name.unwrap_or_else(|| "upload.bin".to_string());

    let source_path = ingest::save_upload(&state.config, &file_name, &file_bytes)?;
    let (module_id, ..) = ingest::process_module(
        &state.catalog,
        &state.config,
        &source_path,
        &title,
        &topic,
        tier,
        &state.cache,
    )?;

    let modules = loaded_modules(&state, &ModuleFilter::default())?;
    Ok(Json(UploadResponse {
        status: "ok",
        module_id,
        modules,
    }))
}

#[derive(Serialize)]
pub struct DeleteModuleResponse {
    status: &'static str,
    modules: Vec<ModuleView>,
}

pub async fn delete_module(
    State(state): State<Arc<AppState>>,
    Path(module_id): Path<i64>,
    ApiJson(body): ApiJson<AdminKeyBody>,
) -> Result<Json<DeleteModuleResponse>, ApiError> {
    if !state.admin_key_matches(&body.admin_key) {
        return Err(ApiError::AuthMissing);
    }

    let removed = ingest::delete_module(&state.catalog, &state.config, module_id, &state.cache)?;
    if !removed {
        return Err(ApiError::NotFound);
    }

    let modules = loaded_modules(&state, &ModuleFilter::default())?;
    Ok(Json(DeleteModuleResponse {
        status: "ok",
        modules,
    }))
}

#[derive(Deserialize)]
pub struct AddQuizRequest {
    admin_key: String,
    module_id: i64,
    question: String,
    options: Vec<String>,
    correct: i64,
}

#[derive(Serialize)]
pub struct AddQuizResponse {
    status: &'static str,
    question_id: i64,
}

pub async fn add_quiz(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<AddQuizRequest>,
) -> Result<Json<AddQuizResponse>, ApiError> {
    if !state.admin_key_matches(&body.admin_key) {
        return Err(ApiError::AuthMissing);
    }

    let question_id = state
        .catalog
        .add_quiz(body.module_id, &body.question, &body.options, body.correct)?;

    Ok(Json(AddQuizResponse {
        status: "ok",
        question_id,
    }))
}

pub async fn delete_quiz(
    State(state): State<Arc<AppState>>,
    Path(question_id): Path<i64>,
    ApiJson(body): ApiJson<AdminKeyBody>,
) -> Result<Json<StatusResponse>, ApiError> {
    if !state.admin_key_matches(&body.admin_key) {
        return Err(ApiError::AuthMissing);
    }

    let removed = state.catalog.delete_quiz(question_id)?;
    if !removed {
        return Err(ApiError::NotFound);
    }

    Ok(Json(StatusResponse { status: "ok" }))
}
