// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{defaults, env as vars};

/// Settings the resource client itself honors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound on the time a single CRUD call may take
    pub request_timeout: Duration,
    /// Capacity of the channel between a watch task and its consumer
    pub watch_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            watch_buffer: defaults::WATCH_BUFFER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => bail!("unknown output format '{}', expected json or yaml", other),
        }
    }
}

/// Watcher configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace to watch; falls back to the kube client's default namespace
    pub namespace: Option<String>,
    pub client: ClientConfig,
    /// Forwarded to the server as `timeoutSeconds` on watch requests
    pub watch_timeout_secs: Option<u32>,
    pub output: OutputFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let namespace = lookup(vars::NAMESPACE).filter(|ns| !ns.is_empty());

        let request_timeout = match lookup(vars::REQUEST_TIMEOUT_SECS) {
            Some(v) => Duration::from_secs(
                v.parse()
                    .with_context(|| format!("{} must be a number of seconds", vars::REQUEST_TIMEOUT_SECS))?,
            ),
            None => Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        };

        let watch_buffer = match lookup(vars::WATCH_BUFFER) {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("{} must be a positive integer", vars::WATCH_BUFFER))?
                .max(1),
            None => defaults::WATCH_BUFFER,
        };

        let watch_timeout_secs = lookup(vars::WATCH_TIMEOUT_SECS)
            .map(|v| v.parse::<u32>())
            .transpose()
            .with_context(|| format!("{} must be a number of seconds", vars::WATCH_TIMEOUT_SECS))?;

        let output = lookup(vars::OUTPUT)
            .map(|v| v.parse::<OutputFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Config {
            namespace,
            client: ClientConfig {
                request_timeout,
                watch_buffer,
            },
            watch_timeout_secs,
            output,
        })
    }
}
