// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod dispatch;
mod graph;

pub use config::{ConfigError, ValidationError};
pub use dispatch::{BoxError, DispatchError, DispatchResult};
pub use graph::NodeShapeError;
