// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared constants, logging setup, and digest helpers used by every other
//! `ghostpir-*` crate.

pub mod config;
pub mod digest;
pub mod logging;

pub use config::{Config, CHUNK_SIZE, K, MODULUS};
