// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use ghostpir_catalog::{Module, ModuleFilter};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CatalogQuery {
    topic: Option<String>,
    tier: Option<i64>,
}

#[derive(Serialize)]
pub struct ModuleView {
    pub id: i64,
    pub title: String,
    pub topic: String,
    pub tier: i64,
    pub chunk_count: i64,
    pub compressed_size: i64,
    pub filename: String,
}

impl From<Module> for ModuleView {
    fn from(m: Module) -> Self {
        ModuleView {
            id: m.id,
            title: m.title,
            topic: m.topic,
            tier: m.tier,
            chunk_count: m.chunk_count,
            compressed_size: m.compressed_size,
            filename: m.filename,
        }
    }
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub modules: Vec<ModuleView>,
}

/// The catalog minus anything not currently loaded in the chunk cache —
/// the invariant that non-admin clients only ever see `DB ∩ cached`.
pub(crate) fn loaded_modules(state: &AppState, filter: &ModuleFilter) -> Result<Vec<ModuleView>, ApiError> {
    let rows = state.catalog.list_modules(filter)?;
    let snapshot = state.cache.snapshot();
    Ok(rows
        .into_iter()
        .filter(|m| snapshot.module(m.id).is_some())
        .map(ModuleView::from)
        .collect())
}

pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let filter = ModuleFilter {
        topic: q.topic,
        tier: q.tier,
    };
    let modules = loaded_modules(&state, &filter)?;
    Ok(Json(CatalogResponse { modules }))
}
