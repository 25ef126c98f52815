// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request path construction for a resource collection.

use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::Resource;
use url::{Position, Url};

use crate::error::{Error, Result};

// Paths are assembled on a throwaway origin so `Url` does the segment and
// query encoding; only the path and query are handed to the transport.
const LOCAL_ORIGIN: &str = "http://localhost/";

/// Whether a resource scope places objects inside namespaces.
pub trait ScopeExt {
    const NAMESPACED: bool;
}

impl ScopeExt for NamespaceResourceScope {
    const NAMESPACED: bool = true;
}

impl ScopeExt for ClusterResourceScope {
    const NAMESPACED: bool = false;
}

/// Identifies the collection a client talks to. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    group: String,
    version: String,
    plural: String,
    namespaced: bool,
    root: Url,
}

impl ResourceDescriptor {
    /// Describe a collection. An empty `group` selects the core API group.
    pub fn new(group: &str, version: &str, plural: &str, namespaced: bool) -> Result<Self> {
        if plural.trim().is_empty() {
            return Err(Error::InvalidResource(
                "resource name must not be empty".to_string(),
            ));
        }
        if version.trim().is_empty() {
            return Err(Error::InvalidResource(format!(
                "API version for '{}' must not be empty",
                plural
            )));
        }

        let root = Url::parse(LOCAL_ORIGIN).map_err(|e| Error::InvalidResource(e.to_string()))?;

        Ok(Self {
            group: group.to_string(),
            version: version.to_string(),
            plural: plural.to_string(),
            namespaced,
            root,
        })
    }

    /// Derive the descriptor from a statically typed resource.
    pub fn of<K>() -> Result<Self>
    where
        K: Resource<DynamicType = ()>,
        K::Scope: ScopeExt,
    {
        Self::new(
            &K::group(&()),
            &K::version(&()),
            &K::plural(&()),
            <K::Scope as ScopeExt>::NAMESPACED,
        )
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Plural resource name, e.g. `releases`
    pub fn plural(&self) -> &str {
        &self.plural
    }

    pub fn is_namespaced(&self) -> bool {
        self.namespaced
    }

    /// Start building a request path against this collection.
    pub fn path(&self) -> ResourcePath<'_> {
        ResourcePath {
            descriptor: self,
            namespace: None,
            name: None,
            subresources: Vec::new(),
            query: Vec::new(),
        }
    }
}

/// Builder for a single request path.
///
/// The namespace segment is only emitted for namespaced collections, the
/// name segment only when a non-empty name is given, and sub-resources
/// follow the name in the order they were added.
#[derive(Debug, Clone)]
pub struct ResourcePath<'a> {
    descriptor: &'a ResourceDescriptor,
    namespace: Option<&'a str>,
    name: Option<&'a str>,
    subresources: Vec<&'a str>,
    query: Vec<(&'static str, String)>,
}

impl<'a> ResourcePath<'a> {
    pub fn namespace(mut self, namespace: Option<&'a str>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name).filter(|n| !n.is_empty());
        self
    }

    pub fn subresources(mut self, subresources: &[&'a str]) -> Self {
        self.subresources
            .extend(subresources.iter().copied().filter(|s| !s.is_empty()));
        self
    }

    pub fn query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Render the path and query string, e.g.
    /// `/apis/platform.koli.io/v1/namespaces/default/releases/v1?limit=10`.
    pub fn build(&self) -> String {
        let descriptor = self.descriptor;
        let mut url = descriptor.root.clone();

        // The root is an http URL, which always has path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear();
            if descriptor.group.is_empty() {
                segments.extend(["api", descriptor.version.as_str()]);
            } else {
                segments.extend(["apis", descriptor.group.as_str(), descriptor.version.as_str()]);
            }
            if descriptor.namespaced {
                if let Some(namespace) = self.namespace {
                    segments.extend(["namespaces", namespace]);
                }
            }
            segments.push(&descriptor.plural);
            if let Some(name) = self.name {
                segments.push(name);
            }
            segments.extend(self.subresources.iter().copied());
        }

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        url[Position::BeforePath..].to_string()
    }
}
