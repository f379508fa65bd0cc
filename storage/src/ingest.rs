// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Compress → chunk → persist → register → reload.
//!
//! The catalog row is inserted *before* any chunk file is written, using
//! the store-assigned id as the chunk directory name. A crash between the
//! insert and the chunk writes leaves an orphan catalog row with no
//! directory — harmless, since [`crate::cache::ChunkCache::preload`] simply
//! never loads it and an admin can retry the upload. The inverse ordering
//! (write chunks first, then insert) would instead risk an orphan
//! directory that could later collide with an id assigned to unrelated
//! content.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use ghostpir_catalog::CatalogStore;
use ghostpir_utils::config::{sanitize_filename, Config, CHUNK_SIZE, GZIP_LEVEL};

use crate::cache::ChunkCache;
use crate::error::Result;

/// Save raw uploaded bytes under `config.upload_dir`, sanitizing the
/// caller-supplied name first. Returns the path the bytes were written to.
/// These originals are retained as provenance; nothing ever reads them back
/// for chunking.
pub fn save_upload(config: &Config, raw_filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.upload_dir)?;
    let safe_name = sanitize_filename(raw_filename);
    let path = config.upload_dir.join(&safe_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Compress and chunk a module already saved at `source_path`, register it
/// in the catalog, write its chunk files, and reload the chunk cache so it
/// is immediately queryable. Returns `(module_id, chunk_count,
/// compressed_size)`.
pub fn process_module(
    catalog: &CatalogStore,
    config: &Config,
    source_path: &Path,
    title: &str,
    topic: &str,
    tier: i64,
    cache: &ChunkCache,
) -> Result<(i64, i64, i64)> {
    let filename = source_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string());

    let raw = std::fs::read(source_path)?;
    let compressed = gzip_compress(&raw);
    let compressed_size = compressed.len() as i64;
    let chunk_count = compressed.len().div_ceil(CHUNK_SIZE) as i64;

    // Insert first so chunk files land under the id SQLite actually
    // assigned.
    let module_id = catalog.add_module(
        title,
        topic,
        tier,
        chunk_count,
        compressed_size,
        &filename,
    )?;

    let module_dir = config.module_chunk_dir(module_id);
    std::fs::create_dir_all(&module_dir)?;

    for (idx, slice) in compressed.chunks(CHUNK_SIZE).enumerate() {
        std::fs::write(module_dir.join(format!("{idx}.bin")), slice)?;
    }

    cache.preload(catalog, &config.chunk_dir())?;

    Ok((module_id, chunk_count, compressed_size))
}

/// Remove a module: delete its catalog row, remove its chunk directory, and
/// reload the cache. Returns whether a catalog row actually existed.
pub fn delete_module(
    catalog: &CatalogStore,
    config: &Config,
    module_id: i64,
    cache: &ChunkCache,
) -> Result<bool> {
    let removed = catalog.delete_module(module_id)?;

    let module_dir = config.module_chunk_dir(module_id);
    if module_dir.is_dir() {
        std::fs::remove_dir_all(&module_dir)?;
    }

    cache.preload(catalog, &config.chunk_dir())?;
    Ok(removed)
}

fn gzip_compress(raw: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(GZIP_LEVEL));
    encoder
        .write_all(raw)
        .expect("writing to an in-memory Vec never fails");
    encoder.finish().expect("finishing an in-memory gzip stream never fails")
}
