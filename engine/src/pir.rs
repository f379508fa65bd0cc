// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Matrix assembly and modular linear combination.
//!
//! This is a single-server PIR backend: all `K` query vectors are processed
//! by the same process, which means that process could, in principle, sum
//! the vectors and recover which module/chunk was actually wanted. That is
//! an intentional, documented limitation of the current deployment, not a
//! bug to be silently patched here — a real multi-server scheme needs
//! independent servers that never see each other's vectors. This engine's
//! job is limited to: accept `K` vectors, return `K` responses, never leak
//! more than the summation attack already implies.
//!
//! The matrix itself is public (it's built from the server's own chunk
//! cache); only the vectors are secret, and they are byte-wise uniform from
//! the server's point of view. A straightforward multiply-accumulate over
//! every module row, every call, is therefore already constant-shape with
//! respect to the secret vectors — there is no data-dependent branching to
//! avoid.

use std::sync::Arc;

use ghostpir_storage::ChunksSnapshot;
use ghostpir_utils::config::{CHUNK_SIZE, K, MODULUS};

use crate::error::{EngineError, Result};

/// A PIR engine bound to one immutable chunk-cache snapshot. Construct a
/// fresh one per request from [`ghostpir_storage::ChunkCache::snapshot`] so
/// the whole computation runs against a single consistent view even if a
/// reload happens concurrently.
pub struct PirEngine {
    snapshot: Arc<ChunksSnapshot>,
    /// Module ids in ascending order — the canonical coordinate system
    /// query vectors are indexed by. The `/catalog` response's id-ascending
    /// order conveys this same ordering to the client.
    module_order: Vec<i64>,
    /// When set, refuses to process more than one vector per request. Off
    /// by default, since the protocol's default commitment is exactly `K`
    /// vectors per request.
    max_vectors_per_request: Option<usize>,
}

impl PirEngine {
    pub fn new(snapshot: Arc<ChunksSnapshot>) -> Self {
        let mut module_order = snapshot.module_ids();
        module_order.sort_unstable();
        PirEngine {
            snapshot,
            module_order,
            max_vectors_per_request: None,
        }
    }

    /// Opt into a deployment mode that refuses more than one vector per
    /// request, per the Design Notes' forward-looking privacy remark. Not
    /// used by the default server configuration.
    pub fn with_max_vectors_per_request(mut self, max: usize) -> Self {
        self.max_vectors_per_request = Some(max);
        self
    }

    /// Number of modules currently loaded — the length every query vector
    /// must have.
    pub fn n_modules(&self) -> usize {
        self.module_order.len()
    }

    /// Canonical (ascending) module ordering this engine was built against.
    pub fn module_order(&self) -> &[i64] {
        &self.module_order
    }

    /// Compute `K` responses, one per query vector, for `chunk_idx`.
    ///
    /// Preconditions, each failing with a distinct error:
    /// - the cache is non-empty;
    /// - exactly `K` vectors were supplied (or `max_vectors_per_request` if
    ///   a stricter deployment mode is active);
    /// - every vector has length `n_modules()`.
    ///
    /// All-or-nothing: either every response is returned, or none are.
    pub fn compute(&self, vectors: &[Vec<u8>], chunk_idx: i64) -> Result<Vec<Vec<u8>>> {
        if self.module_order.is_empty() {
            return Err(EngineError::EmptyCache);
        }

        let expected_count = self.max_vectors_per_request.unwrap_or(K);
        if vectors.len() != expected_count {
            return Err(EngineError::WrongVectorCount {
                expected: expected_count,
                got: vectors.len(),
            });
        }

        let n = self.module_order.len();
        for (index, v) in vectors.iter().enumerate() {
            if v.len() != n {
                return Err(EngineError::WrongVectorLength {
                    index,
                    expected: n,
                    got: v.len(),
                });
            }
        }

        let matrix = self.assemble_matrix(chunk_idx);

        Ok(vectors
            .iter()
            .map(|v| multiply_mod(v, &matrix))
            .collect())
    }

    /// Row `i` is the chunk at `chunk_idx` for module `module_order[i]`,
    /// zero-padded to `CHUNK_SIZE`. A module whose `chunk_count <=
    /// chunk_idx` (no entry in the snapshot) contributes an all-zero row —
    /// the same policy as a present-but-short chunk, so the server never
    /// distinguishes "short" from "absent" through response shape.
    fn assemble_matrix(&self, chunk_idx: i64) -> Vec<[u8; CHUNK_SIZE]> {
        self.module_order
            .iter()
            .map(|&module_id| {
                let mut row = [0u8; CHUNK_SIZE];
                if let Some(bytes) = self.snapshot.chunk(module_id, chunk_idx) {
                    row[..bytes.len()].copy_from_slice(bytes);
                }
                row
            })
            .collect()
    }
}

/// `r = v . M mod 256`, accumulating in a wider type before reducing.
fn multiply_mod(v: &[u8], matrix: &[[u8; CHUNK_SIZE]]) -> Vec<u8> {
    let mut acc = [0u32; CHUNK_SIZE];
    for (coeff, row) in v.iter().zip(matrix.iter()) {
        let coeff = *coeff as u32;
        if coeff == 0 {
            continue;
        }
        for (a, &byte) in acc.iter_mut().zip(row.iter()) {
            *a += coeff * byte as u32;
        }
    }
    acc.iter().map(|&a| (a % MODULUS) as u8).collect()
}
