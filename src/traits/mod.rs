// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod dispatcher;
pub mod metadata_source;

pub use dispatcher::{Dispatcher, SubmitOptions, TaskHandle};
pub use metadata_source::{MetadataSource, StaticSource};
