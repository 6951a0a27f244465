// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dispatcher implementations that live inside this crate.
//!
//! Real brokers are external; anything implementing
//! [`Dispatcher`](crate::traits::Dispatcher) can be plugged into a
//! [`DispatchFacade`](crate::engine::DispatchFacade). What ships here is for
//! tests and demos.
//!
//! # Available Backends
//!
//! ## Memory Backend
//! - **InMemoryDispatcher**: records every submitted graph and returns
//!   handles whose results are resolved by hand
//!
//! ## Stub Backend (Test-Only)
//! - **FailingDispatcher**: rejects every submission
//! - **FailingSource**: a metadata source that always errors
//! - **Note**: NOT available in production builds

pub mod memory;
#[cfg(test)]
pub mod stub;
