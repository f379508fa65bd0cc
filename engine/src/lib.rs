// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! The PIR compute engine: matrix assembly over a chunk-cache snapshot, the
//! mod-256 multiply-accumulate, and chunk integrity hashing.
//!
//! # Deployment note
//!
//! This is a single-server deployment. A single server that sees all `K`
//! query vectors can sum them and recover the selection vector, which
//! defeats the privacy goal a multi-server PIR scheme would otherwise give
//! you. That limitation is inherent to running every vector through one
//! process and is not something this crate can fix internally — an actual
//! privacy-preserving deployment needs `K` independent, non-colluding
//! servers, each holding one vector. [`pir::PirEngine::with_max_vectors_per_request`]
//! exists for operators who want to enforce that topology (one vector per
//! request, fanned out to independent server processes) without changing
//! the wire protocol.

pub mod error;
pub mod integrity;
pub mod pir;

pub use error::{EngineError, Result};
pub use integrity::chunk_hash;
pub use pir::PirEngine;
