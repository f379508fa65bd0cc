// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// A catalog row for one ingested module.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    pub id: i64,
    pub title: String,
    pub topic: String,
    pub tier: i64,
    pub chunk_count: i64,
    pub compressed_size: i64,
    pub filename: String,
}

/// A single quiz question attached to a module.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub id: i64,
    pub module_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub correct: i64,
}

/// Optional conjunctive filters for `list_modules`.
#[derive(Clone, Debug, Default)]
pub struct ModuleFilter {
    pub topic: Option<String>,
    pub tier: Option<i64>,
}
