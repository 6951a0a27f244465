// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Inbound header carrying the trace id
pub const DEFAULT_TRACE_HEADER: &str = "x-trace-id";
/// Inbound header carrying the tenant id
pub const DEFAULT_TENANT_HEADER: &str = "x-tenant-id";
/// Separator between segments of a node path in validation messages
pub const PATH_SEPARATOR: &str = "/";
