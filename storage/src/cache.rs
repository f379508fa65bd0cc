// Copyright 2020 Ant Group. All rights reserved.
// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! The chunk cache: an in-memory index of every module's compressed chunks,
//! rebuilt wholesale on ingest and delete and published atomically so that
//! concurrent readers never observe a module half-updated.
//!
//! Disk is the source of truth; this is a cache of it. A second source of
//! truth, the catalog database, can disagree with the chunk directory after
//! a crash (an orphan row with no directory, or an orphan directory with no
//! row). [`ChunkCache::preload`] closes that gap by intersecting the two —
//! it never repairs either side.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use ghostpir_catalog::CatalogStore;

use crate::error::Result;

/// One fully-loaded snapshot of the chunk cache: `module_id -> chunk_index
/// -> raw bytes`. Every chunk except possibly the last one of a module is
/// exactly `CHUNK_SIZE` bytes; the last may be shorter and is stored at its
/// true length.
#[derive(Default, Debug)]
pub struct ChunksSnapshot {
    modules: HashMap<i64, HashMap<i64, Vec<u8>>>,
}

impl ChunksSnapshot {
    /// Chunks for one module, if that module is currently loaded.
    pub fn module(&self, module_id: i64) -> Option<&HashMap<i64, Vec<u8>>> {
        self.modules.get(&module_id)
    }

    /// A single chunk's raw bytes, if both the module and the chunk index
    /// are present.
    pub fn chunk(&self, module_id: i64, chunk_index: i64) -> Option<&[u8]> {
        self.modules.get(&module_id)?.get(&chunk_index).map(|v| v.as_slice())
    }

    /// Module ids currently loaded, in no particular order. Callers that
    /// need the canonical (ascending) module ordering should sort this.
    pub fn module_ids(&self) -> Vec<i64> {
        self.modules.keys().copied().collect()
    }

    /// Number of distinct modules currently loaded.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Process-wide handle to the current chunk cache snapshot. Readers call
/// [`ChunkCache::snapshot`] once per operation and hold onto the returned
/// `Arc` for as long as they need a consistent view — a concurrent
/// `preload()` swaps in a new snapshot without blocking them and without
/// invalidating the one they're holding.
pub struct ChunkCache {
    current: ArcSwap<ChunksSnapshot>,
}

impl ChunkCache {
    pub fn new() -> Self {
        ChunkCache {
            current: ArcSwap::from_pointee(ChunksSnapshot::default()),
        }
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<ChunksSnapshot> {
        self.current.load_full()
    }

    /// Rebuild the cache from scratch and publish it atomically.
    ///
    /// 1. Query the catalog for the set of valid module ids.
    /// 2. Scan `chunk_dir` for subdirectories whose names parse as
    ///    integers.
    /// 3. For each such id that the catalog also knows about, read every
    ///    `<j>.bin` file into the new snapshot. Non-integer filenames,
    ///    non-`.bin` entries, and directories the catalog doesn't know
    ///    about are all silently skipped — stale state, not an error.
    pub fn preload(&self, catalog: &CatalogStore, chunk_dir: &Path) -> Result<()> {
        let mut modules = HashMap::new();

        if chunk_dir.is_dir() {
            let valid_ids = valid_module_ids(catalog)?;

            for entry in std::fs::read_dir(chunk_dir)? {
                let entry = entry?;
                if !entry.file_type()?.is_dir() {
                    continue;
                }

                let name = entry.file_name();
                let name = match name.to_str() {
                    Some(n) => n,
                    None => continue,
                };
                let module_id: i64 = match name.parse() {
                    Ok(id) => id,
                    Err(_) => continue,
                };
                if !valid_ids.contains(&module_id) {
                    continue;
                }

                modules.insert(module_id, load_module_chunks(&entry.path())?);
            }
        }

        self.current.store(Arc::new(ChunksSnapshot { modules }));
        Ok(())
    }
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new()
    }
}

fn valid_module_ids(catalog: &CatalogStore) -> Result<std::collections::HashSet<i64>> {
    let modules = catalog.list_modules(&ghostpir_catalog::ModuleFilter::default())?;
    Ok(modules.into_iter().map(|m| m.id).collect())
}

fn load_module_chunks(module_dir: &Path) -> Result<HashMap<i64, Vec<u8>>> {
    let mut chunks = HashMap::new();

    for entry in std::fs::read_dir(module_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name = match name.to_str() {
            Some(n) => n,
            None => continue,
        };
        let Some(stem) = name.strip_suffix(".bin") else {
            continue;
        };
        let chunk_index: i64 = match stem.parse() {
            Ok(idx) => idx,
            Err(_) => continue,
        };

        chunks.insert(chunk_index, std::fs::read(entry.path())?);
    }

    Ok(chunks)
}
