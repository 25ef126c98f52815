// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use futures::StreamExt;
use kube::Client;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use koli_client::client::{ListOptions, ResourceClient, ResourceDescriptor, WatchEvent};
use koli_client::config::{Config, OutputFormat};
use koli_client::types::Release;

/// One printed line (or document) per watch event
#[derive(Serialize)]
struct Printed<'a> {
    #[serde(rename = "type")]
    event_type: &'a str,
    object: &'a Release,
}

fn print_event(output: OutputFormat, event_type: &str, object: &Release) -> Result<()> {
    let printed = Printed { event_type, object };
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(&printed)?),
        OutputFormat::Yaml => print!("---\n{}", serde_yaml::to_string(&printed)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting koli-watch {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    match client.apiserver_version().await {
        Ok(version) => info!("Connected to Kubernetes API server {}", version.git_version),
        Err(e) => warn!("Could not determine API server version: {}", e),
    }

    let namespace = config
        .namespace
        .clone()
        .unwrap_or_else(|| client.default_namespace().to_string());

    let releases = ResourceClient::<Release>::namespaced(
        client,
        ResourceDescriptor::of::<Release>()?,
        &namespace,
    )
    .with_config(config.client);

    let mut options = ListOptions::default();
    if let Some(seconds) = config.watch_timeout_secs {
        options = options.timeout(seconds);
    }

    let mut session = releases
        .watch(&options)
        .await
        .with_context(|| format!("Failed to watch releases in namespace {}", namespace))?;
    info!("Watching releases in namespace {}", namespace);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, closing watch");
                break;
            }
            event = session.next() => match event {
                Some(WatchEvent::Error(e)) => {
                    error!("Watch failed: {}", e);
                    break;
                }
                Some(WatchEvent::Bookmark { resource_version }) => {
                    debug!("Bookmark at resource version {}", resource_version);
                }
                Some(event) => {
                    let event_type = event.event_type();
                    if let Some(object) = event.object() {
                        print_event(config.output, event_type, object)?;
                    }
                }
                None => {
                    info!("Watch ended by the server");
                    break;
                }
            },
        }
    }

    session.shutdown().await;
    Ok(())
}
