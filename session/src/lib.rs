// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Opaque session tokens that gate PIR retrieval.
//!
//! Tokens are 32 bytes of CSPRNG output, hex-encoded (64 chars), and carry
//! no information about the `ghost_id` they were issued for — they are
//! bearer credentials, not identifiers. Expiry slides on every successful
//! [`SessionStore::validate`] call so a long multi-chunk download never
//! expires mid-stream.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::RngCore;

/// Default sliding session lifetime: 15 minutes, enough headroom for a
/// large multi-chunk download.
pub const DEFAULT_TTL: Duration = Duration::from_secs(900);

struct SessionEntry {
    #[allow(dead_code)] // never interpreted, kept only as opaque metadata
    ghost_id: String,
    expires_at: Instant,
}

/// In-memory session table. Cheap to share behind an `Arc`; internally
/// guarded by a single mutex since contention on session lookups is low.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a new token for `ghost_id`. Sweeps expired entries first so
    /// the table never grows unbounded.
    pub fn create(&self, ghost_id: impl Into<String>) -> String {
        let mut sessions = self.sessions.lock();
        evict_expired(&mut sessions);

        let token = random_token();
        sessions.insert(
            token.clone(),
            SessionEntry {
                ghost_id: ghost_id.into(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Validate `token`. Returns `false` for an unknown or expired token
    /// (evicting the latter); on success, slides the expiry forward by
    /// another full TTL.
    pub fn validate(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(entry) = sessions.get_mut(token) else {
            return false;
        };

        if Instant::now() > entry.expires_at {
            sessions.remove(token);
            return false;
        }

        entry.expires_at = Instant::now() + self.ttl;
        true
    }

    /// Number of sessions currently tracked, expired or not. For tests and
    /// diagnostics only.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

fn evict_expired(sessions: &mut HashMap<String, SessionEntry>) {
    let now = Instant::now();
    sessions.retain(|_, entry| entry.expires_at >= now);
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
