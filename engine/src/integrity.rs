// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Out-of-band integrity hashes, so a client can verify a PIR response
//! against the chunk it actually received without that lookup itself
//! leaking which module/chunk was retrieved — the hash of every chunk in
//! the catalog is public anyway, so serving it plainly costs nothing.

use std::sync::Arc;

use ghostpir_storage::ChunksSnapshot;
use ghostpir_utils::digest::sha256_hex;

use crate::error::{EngineError, Result};

/// SHA-256 hex digest of the exact bytes stored for `module_id`'s chunk
/// `chunk_idx` (post-gzip, pre-padding — the padding PIR applies during
/// `compute` is never hashed).
pub fn chunk_hash(snapshot: &Arc<ChunksSnapshot>, module_id: i64, chunk_idx: i64) -> Result<String> {
    snapshot
        .chunk(module_id, chunk_idx)
        .map(sha256_hex)
        .ok_or(EngineError::NotFound)
}
