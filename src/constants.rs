// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Client defaults
pub mod defaults {
    /// Upper bound on a single CRUD request, in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Capacity of the bounded channel between a watch task and its consumer
    pub const WATCH_BUFFER: usize = 16;
    /// Largest single watch event the decoder will buffer
    pub const MAX_EVENT_BYTES: usize = 16 * 1024 * 1024;
}

/// Environment variables read by `Config::from_env`
pub mod env {
    pub const NAMESPACE: &str = "KOLI_NAMESPACE";
    pub const REQUEST_TIMEOUT_SECS: &str = "KOLI_REQUEST_TIMEOUT_SECS";
    pub const WATCH_BUFFER: &str = "KOLI_WATCH_BUFFER";
    pub const WATCH_TIMEOUT_SECS: &str = "KOLI_WATCH_TIMEOUT_SECS";
    pub const OUTPUT: &str = "KOLI_OUTPUT";
}

/// Content types sent with request bodies
pub mod content_type {
    pub const JSON: &str = "application/json";
    pub const JSON_PATCH: &str = "application/json-patch+json";
    pub const MERGE_PATCH: &str = "application/merge-patch+json";
    pub const STRATEGIC_MERGE_PATCH: &str = "application/strategic-merge-patch+json";
}
