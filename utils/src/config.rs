// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Fixed protocol constants and filesystem layout, read once at startup.

use std::path::{Path, PathBuf};

/// Size in bytes of a single PIR chunk. The last chunk of a module's
/// compressed representation may be shorter; every other chunk is exactly
/// this many bytes.
pub const CHUNK_SIZE: usize = 4096;

/// Number of query vectors a `/kpir` request must carry. Fixed by the
/// client/server wire protocol; changing it is a breaking protocol change.
pub const K: usize = 3;

/// Arithmetic is carried out in this ring.
pub const MODULUS: u32 = 256;

/// gzip compression level used by the ingest pipeline. Chosen to match the
/// original reference implementation's `gzip.compress(raw, compresslevel=6)`.
pub const GZIP_LEVEL: u32 = 6;

/// Sliding session expiry, in seconds.
pub const SESSION_TTL_SECS: u64 = 900;

/// Environment variable carrying the admin shared secret.
pub const ADMIN_SECRET_ENV: &str = "ADMIN_SECRET";

/// Built-in admin secret used when `ADMIN_SECRET` is unset. A startup
/// warning is always emitted when this default is in effect.
pub const DEFAULT_ADMIN_SECRET: &str = "kc";

/// Resolved on-disk layout and runtime knobs for one running server.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root data directory; holds `catalog.db` and `chunks/`.
    pub data_dir: PathBuf,
    /// Directory retained uploads are written to, for provenance only.
    pub upload_dir: PathBuf,
    /// Shared secret admin requests must present.
    pub admin_secret: String,
    /// When set, `/kpir` refuses more than one vector per request — the
    /// deployment mode that only makes sense once `K` independent,
    /// non-colluding servers each hold one vector. Off by default, since
    /// the wire protocol's default commitment is `K` vectors per request.
    pub strict_single_vector: bool,
}

impl Config {
    /// Build a config rooted at `data_dir`, reading `ADMIN_SECRET` from the
    /// environment and falling back to [`DEFAULT_ADMIN_SECRET`] with a
    /// warning, mirroring the original deployment's behavior.
    pub fn new(data_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self::new_with_admin_secret_env(data_dir, upload_dir, ADMIN_SECRET_ENV)
    }

    /// Like [`Config::new`], but reads the admin secret from `admin_secret_env`
    /// instead of the fixed [`ADMIN_SECRET_ENV`] name — the `--admin-secret-env`
    /// CLI override point.
    pub fn new_with_admin_secret_env(
        data_dir: impl Into<PathBuf>,
        upload_dir: impl Into<PathBuf>,
        admin_secret_env: &str,
    ) -> Self {
        let admin_secret = match std::env::var(admin_secret_env) {
            Ok(v) if !v.is_empty() => v,
            _ => {
                log::warn!(
                    "{} is not set; falling back to the built-in default admin secret. \
                     This is not safe for production deployments.",
                    admin_secret_env
                );
                DEFAULT_ADMIN_SECRET.to_string()
            }
        };

        Config {
            data_dir: data_dir.into(),
            upload_dir: upload_dir.into(),
            admin_secret,
            strict_single_vector: false,
        }
    }

    /// Opt into the single-vector-per-request deployment mode.
    pub fn with_strict_single_vector(mut self, strict: bool) -> Self {
        self.strict_single_vector = strict;
        self
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.data_dir.join("catalog.db")
    }

    pub fn chunk_dir(&self) -> PathBuf {
        self.data_dir.join("chunks")
    }

    pub fn module_chunk_dir(&self, module_id: i64) -> PathBuf {
        self.chunk_dir().join(module_id.to_string())
    }
}

/// Strip any directory components from an untrusted uploaded filename.
/// Path traversal via `../` or absolute paths is a hard bug class, so this
/// keeps only the final path segment and substitutes a fixed placeholder
/// when nothing usable remains.
pub fn sanitize_filename(raw: &str) -> String {
    let name = Path::new(raw)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        "upload.bin".to_string()
    } else {
        name
    }
}
