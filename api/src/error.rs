// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! One error enum at the HTTP boundary, mapping each kind to exactly one
//! status code. `RequestShape` never carries detail (malformed JSON, wrong
//! multipart field) since that detail is internal; `RequestSemantics` always
//! names the specific violation, since that's what lets a client self-correct
//! (e.g. re-fetch `/catalog` on a vector-length mismatch).

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use ghostpir_catalog::CatalogError;
use ghostpir_engine::EngineError;
use ghostpir_storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("admin secret mismatch")]
    AuthMissing,

    #[error("invalid or expired session")]
    SessionInvalid,

    #[error("malformed request body")]
    RequestShape,

    #[error("{0}")]
    RequestSemantics(String),

    #[error("not found")]
    NotFound,

    #[error("no modules are currently loaded")]
    ServiceUnavailable,

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::AuthMissing => StatusCode::FORBIDDEN,
            ApiError::SessionInvalid => StatusCode::UNAUTHORIZED,
            ApiError::RequestShape => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RequestSemantics(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Internal(err) = &self {
            log::error!("internal error handling request: {err:#}");
        }

        let message = match &self {
            ApiError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::RequestShape
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptyCache => ApiError::ServiceUnavailable,
            EngineError::WrongVectorCount { .. } | EngineError::WrongVectorLength { .. } => {
                ApiError::RequestSemantics(err.to_string())
            }
            EngineError::NotFound => ApiError::NotFound,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => ApiError::NotFound,
            CatalogError::Constraint(msg) => ApiError::RequestSemantics(msg),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Catalog(catalog_err) => catalog_err.into(),
            other => ApiError::Internal(other.into()),
        }
    }
}
