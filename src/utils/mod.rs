// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod metadata;

pub use metadata::{merge_metadata, metadata_from_pairs, Metadata};
