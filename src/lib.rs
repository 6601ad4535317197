// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod db;
pub mod metrics;
pub mod models;
pub mod period;
pub mod profile;
pub mod utils;
pub mod commands;
