// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use client::{ResourceClient, ResourceDescriptor, WatchEvent, WatchSession};
pub use error::{Error, Result};
