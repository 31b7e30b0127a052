// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod cli;
pub mod commands;
pub mod dates;
pub mod db;
pub mod models;
pub mod periods;
pub mod store;
pub mod trends;
pub mod utils;
pub mod validate;
