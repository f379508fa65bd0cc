// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

pub mod admin;
pub mod catalog;
pub mod integrity;
pub mod kpir;
pub mod quiz;
pub mod session;
