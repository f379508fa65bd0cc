// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use ghostpir_catalog::CatalogStore;
use ghostpir_session::SessionStore;
use ghostpir_storage::ChunkCache;
use ghostpir_utils::Config;

/// Everything a request handler needs, cloned cheaply into every handler via
/// `axum::extract::State<Arc<AppState>>`.
pub struct AppState {
    pub catalog: CatalogStore,
    pub cache: ChunkCache,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn admin_key_matches(&self, presented: &str) -> bool {
        presented == self.config.admin_secret
    }
}
