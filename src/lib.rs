// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // dispatcher backends
pub mod config;     // config + templates
pub mod context;    // per-request context
pub mod engine;     // annotation + facade
pub mod errors;     // error handling
pub mod graph;      // task graph model
pub mod observability;
pub mod traits;     // unified abstractions
pub mod utils;
