// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors the PIR engine and the integrity lookup can raise. Each variant
/// maps to exactly one client-visible HTTP status at the API boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// No modules are currently loaded; nothing can be computed yet.
    #[error("no modules are currently loaded")]
    EmptyCache,

    /// The request didn't carry exactly `K` vectors.
    #[error("expected {expected} vectors, got {got}")]
    WrongVectorCount { expected: usize, got: usize },

    /// Vector `index` didn't have one coordinate per loaded module.
    #[error("vector {index} has length {got}, expected {expected} (the loaded module count)")]
    WrongVectorLength {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// A requested module or chunk is not present in the cache.
    #[error("not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, EngineError>;
