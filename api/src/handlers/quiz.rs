// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use ghostpir_catalog::QuizQuestion;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct QuizQuestionView {
    pub id: i64,
    pub module_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub correct: i64,
}

impl From<QuizQuestion> for QuizQuestionView {
    fn from(q: QuizQuestion) -> Self {
        QuizQuestionView {
            id: q.id,
            module_id: q.module_id,
            question: q.question,
            options: q.options,
            correct: q.correct,
        }
    }
}

#[derive(Serialize)]
pub struct QuizListResponse {
    pub questions: Vec<QuizQuestionView>,
}

pub async fn list_quiz(
    State(state): State<Arc<AppState>>,
    Path(module_id): Path<i64>,
) -> Result<Json<QuizListResponse>, ApiError> {
    let questions = state
        .catalog
        .list_quiz(module_id)?
        .into_iter()
        .map(QuizQuestionView::from)
        .collect();
    Ok(Json(QuizListResponse { questions }))
}
