// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Process-wide logger setup, shared by the server binary and its tests.

use flexi_logger::{FileSpec, Logger};

/// Initialize the global logger from the `RUST_LOG`-style spec, or `"info"`
/// when unset. Safe to call once at process start; calling it twice panics,
/// same as the underlying `flexi_logger` handle.
pub fn init(log_dir: Option<&str>) -> anyhow::Result<()> {
    let spec = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let mut logger = Logger::try_with_str(spec)?;

    if let Some(dir) = log_dir {
        logger = logger.log_to_file(FileSpec::default().directory(dir));
    }

    logger.start()?;
    Ok(())
}
