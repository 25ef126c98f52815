// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed CRUD client over one resource collection.

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use http::{header, Method, Request};
use http_body_util::BodyExt;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use kube::client::Body;
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::client::codec::JsonCodec;
use crate::client::params::{DeleteOptions, ListOptions, PatchType};
use crate::client::path::ResourceDescriptor;
use crate::client::watch::EventDecoder;
use crate::client::events::WatchSession;
use crate::config::ClientConfig;
use crate::error::{BoxError, Error, RequestContext, Result, Verb};

/// A page of resources plus the list metadata needed for consistent paging.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList<K> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default = "Vec::new")]
    pub items: Vec<K>,
}

impl<K> ResourceList<K> {
    pub fn resource_version(&self) -> Option<&str> {
        self.metadata.resource_version.as_deref()
    }

    /// The token for the next page, if the server has more
    pub fn continue_token(&self) -> Option<&str> {
        self.metadata.continue_.as_deref().filter(|t| !t.is_empty())
    }
}

/// Typed client for a single collection, e.g. the releases of one namespace.
///
/// Every verb builds its own request, so a client can be shared freely
/// between tasks. Calls never retry; retry policy belongs to the caller.
#[derive(Clone)]
pub struct ResourceClient<K> {
    client: Client,
    descriptor: ResourceDescriptor,
    namespace: Option<String>,
    codec: JsonCodec,
    config: ClientConfig,
    phantom: std::iter::Empty<K>,
}

impl<K> ResourceClient<K>
where
    K: Resource + Clone + Debug + Serialize + DeserializeOwned + Send + 'static,
{
    /// Client for the collection in `namespace`. The namespace is ignored for
    /// cluster-scoped collections.
    pub fn namespaced(client: Client, descriptor: ResourceDescriptor, namespace: &str) -> Self {
        Self::build(client, descriptor, Some(namespace.to_string()))
    }

    /// Client for a cluster-scoped collection, or for a namespaced one across all namespaces.
    pub fn all(client: Client, descriptor: ResourceDescriptor) -> Self {
        Self::build(client, descriptor, None)
    }

    fn build(client: Client, descriptor: ResourceDescriptor, namespace: Option<String>) -> Self {
        Self {
            client,
            descriptor,
            namespace: namespace.filter(|ns| !ns.is_empty()),
            codec: JsonCodec,
            config: ClientConfig::default(),
            phantom: std::iter::empty(),
        }
    }

    pub fn with_codec(mut self, codec: JsonCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// The namespace requests are scoped to, if the collection is namespaced
    pub fn namespace(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .filter(|_| self.descriptor.is_namespaced())
    }

    fn context(&self, verb: Verb, name: Option<&str>) -> RequestContext {
        RequestContext::new(verb, self.descriptor.plural(), self.namespace(), name)
    }

    /// Get the resource with the given name.
    #[instrument(skip(self), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn get(&self, name: &str) -> Result<K> {
        let context = self.context(Verb::Get, Some(name));
        let path = self
            .descriptor
            .path()
            .namespace(self.namespace())
            .name(name)
            .build();

        let request = self.request(&context, Method::GET, &path, None, Vec::new())?;
        let body = self.execute(&context, request).await?;
        self.codec.decode(&context, &body)
    }

    /// List resources matching the options. Empty options list everything.
    #[instrument(skip(self), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn list(&self, options: &ListOptions) -> Result<ResourceList<K>> {
        let context = self.context(Verb::List, None);
        let path = self
            .descriptor
            .path()
            .namespace(self.namespace())
            .query(options.list_query())
            .build();

        let request = self.request(&context, Method::GET, &path, None, Vec::new())?;
        let body = self.execute(&context, request).await?;
        let list: ResourceList<K> = self.codec.decode(&context, &body)?;
        debug!("Listed {} {}", list.items.len(), self.descriptor.plural());
        Ok(list)
    }

    /// List every page, following continue tokens until the server has no more.
    pub async fn list_all(&self, options: &ListOptions) -> Result<ResourceList<K>> {
        let mut page = self.list(options).await?;
        let mut items = std::mem::take(&mut page.items);

        while let Some(token) = page.continue_token().map(str::to_string) {
            debug!("Fetching next page of {}", self.descriptor.plural());
            page = self.list(&options.clone().continue_token(&token)).await?;
            items.append(&mut page.items);
        }

        page.items = items;
        page.metadata.continue_ = None;
        Ok(page)
    }

    /// Create the resource; the server's copy (with generated fields) is returned.
    #[instrument(skip(self, data), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn create(&self, data: &K) -> Result<K> {
        let context = self.context(Verb::Create, data.meta().name.as_deref());
        let path = self.descriptor.path().namespace(self.namespace()).build();

        let body = self.codec.encode(&context, data)?;
        let request = self.request(
            &context,
            Method::POST,
            &path,
            Some(self.codec.content_type()),
            body,
        )?;
        let body = self.execute(&context, request).await?;
        let created: K = self.codec.decode(&context, &body)?;
        info!(
            "Created {} {}",
            self.descriptor.plural(),
            created.meta().name.as_deref().unwrap_or_default()
        );
        Ok(created)
    }

    /// Replace the resource. The name is required and checked before any request is made.
    #[instrument(skip(self, data), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn update(&self, data: &K) -> Result<K> {
        let name = data.meta().name.as_deref().unwrap_or_default();
        let context = self.context(Verb::Update, Some(name));
        if name.is_empty() {
            return Err(Error::InvalidArgument {
                context,
                message: "object missing name".to_string(),
            });
        }

        let path = self
            .descriptor
            .path()
            .namespace(self.namespace())
            .name(name)
            .build();

        let body = self.codec.encode(&context, data)?;
        let request = self.request(
            &context,
            Method::PUT,
            &path,
            Some(self.codec.content_type()),
            body,
        )?;
        let body = self.execute(&context, request).await?;
        self.codec.decode(&context, &body)
    }

    /// Delete the named resource, forwarding the options as the request body.
    #[instrument(skip(self, options), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<()> {
        let context = self.context(Verb::Delete, Some(name));
        let path = self
            .descriptor
            .path()
            .namespace(self.namespace())
            .name(name)
            .build();

        let options = options.to_body().map_err(|source| Error::Encode {
            context: context.clone(),
            source,
        })?;
        let body = self.codec.encode(&context, &options)?;
        let request = self.request(
            &context,
            Method::DELETE,
            &path,
            Some(self.codec.content_type()),
            body,
        )?;
        self.execute(&context, request).await?;
        info!("Deleted {} {}", self.descriptor.plural(), name);
        Ok(())
    }

    /// Apply a partial update to the named resource, or to one of its sub-resources.
    #[instrument(skip(self, data), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn patch(
        &self,
        name: &str,
        patch_type: PatchType,
        data: &[u8],
        subresources: &[&str],
    ) -> Result<K> {
        let context = self.context(Verb::Patch, Some(name));
        let path = self
            .descriptor
            .path()
            .namespace(self.namespace())
            .name(name)
            .subresources(subresources)
            .build();

        let request = self.request(
            &context,
            Method::PATCH,
            &path,
            Some(patch_type.content_type()),
            data.to_vec(),
        )?;
        let body = self.execute(&context, request).await?;
        self.codec.decode(&context, &body)
    }

    /// Open a watch on the collection.
    ///
    /// Connection failures and non-success responses are returned here and
    /// no session is created. Events are read by a dedicated task that owns
    /// the connection until the session is closed or the stream ends.
    #[instrument(skip(self), fields(resource = %self.descriptor.plural(), namespace = ?self.namespace()))]
    pub async fn watch(&self, options: &ListOptions) -> Result<WatchSession<K>> {
        let context = self.context(Verb::Watch, None);
        let path = self
            .descriptor
            .path()
            .namespace(self.namespace())
            .query(options.watch_query())
            .build();

        let request = self.request(&context, Method::GET, &path, None, Vec::new())?;
        let response = timeout(self.config.request_timeout, self.client.send(request))
            .await
            .map_err(|_| Error::Timeout {
                context: context.clone(),
                after: self.config.request_timeout,
            })?
            .map_err(|e| Error::transport(context.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = collect_body(&context, response.into_body()).await?;
            return Err(Error::from_response(context, status.as_u16(), &body));
        }

        info!("Watching {}", self.descriptor.plural());
        let stream = response
            .into_body()
            .into_data_stream()
            .map_err(Into::<BoxError>::into)
            .boxed();
        let decoder = EventDecoder::new(stream, self.codec, context);
        Ok(WatchSession::spawn(decoder, self.config.watch_buffer))
    }

    /// Watch starting after the given resource version, e.g. the one returned by `list`.
    pub async fn watch_from(&self, resource_version: &str) -> Result<WatchSession<K>> {
        self.watch(&ListOptions::default().at(resource_version).bookmarks(true))
            .await
    }

    fn request(
        &self,
        context: &RequestContext,
        method: Method,
        path: &str,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<Request<Body>> {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::ACCEPT, self.codec.content_type());
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        builder
            .body(Body::from(body))
            .map_err(|e| Error::InvalidArgument {
                context: context.clone(),
                message: format!("failed to build request for {}: {}", path, e),
            })
    }

    /// Send one request and read the whole response, bounded by the request timeout.
    async fn execute(&self, context: &RequestContext, request: Request<Body>) -> Result<Bytes> {
        debug!("{} {}", request.method(), request.uri());

        let exchange = async {
            let response = self
                .client
                .send(request)
                .await
                .map_err(|e| Error::transport(context.clone(), e))?;
            let status = response.status();
            let body = collect_body(context, response.into_body()).await?;

            if status.is_success() {
                Ok::<Bytes, Error>(body)
            } else {
                Err(Error::from_response(context.clone(), status.as_u16(), &body))
            }
        };

        timeout(self.config.request_timeout, exchange)
            .await
            .map_err(|_| Error::Timeout {
                context: context.clone(),
                after: self.config.request_timeout,
            })?
    }
}

async fn collect_body(context: &RequestContext, body: Body) -> Result<Bytes> {
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| Error::transport(context.clone(), e))
}
