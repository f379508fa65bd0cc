// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors surfaced by the catalog store.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A referenced module or quiz row does not exist.
    #[error("not found")]
    NotFound,

    /// A row violates a store-level constraint (e.g. too few quiz options,
    /// or `correct` out of range).
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
