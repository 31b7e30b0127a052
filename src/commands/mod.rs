// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod doctor;
pub mod exporter;
pub mod migrate;
pub mod prices;
pub mod profile;
pub mod purchases;
pub mod report;
pub mod transactions;
