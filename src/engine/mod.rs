// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod annotate;
pub mod facade;

pub use annotate::{annotate_deep, annotate_one};
pub use facade::{DispatchFacade, SendOptions};
