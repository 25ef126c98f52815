// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

/// A claim on a domain, allowing ingresses to be created for it
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[kube(group = "platform.koli.io", version = "v1", kind = "Domain")]
#[kube(namespaced)]
#[kube(status = "DomainStatus")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct DomainSpec {
    /// Name of the primary domain. A domain is primary when this equals its own name.
    #[serde(rename = "primary", default, skip_serializing_if = "String::is_empty")]
    pub primary_domain: String,
    /// Label prepended to the primary domain to form a subdomain
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub: String,
    /// Namespaces allowed to use this domain, `*` allows all of them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delegates: Vec<String>,
    /// Namespace of the primary domain, for shared domains
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainStatus {
    #[serde(default, skip_serializing_if = "DomainPhase::is_new")]
    pub phase: DomainPhase,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// CamelCase reason for the current phase, e.g. `AlreadyClaimed`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time: Option<Time>,
    /// Set once the claim is being released
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Time>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum DomainPhase {
    /// Not processed yet
    #[default]
    #[serde(rename = "")]
    New,
    #[serde(rename = "OK")]
    Ok,
    Pending,
    Failed,
}

impl DomainPhase {
    pub fn is_new(&self) -> bool {
        *self == DomainPhase::New
    }
}

impl Domain {
    pub fn is_primary(&self) -> bool {
        !self.spec.primary_domain.is_empty() && self.spec.primary_domain == self.name_any()
    }

    /// Fully qualified name: the primary domain, prefixed by the sub label if any
    pub fn fqdn(&self) -> String {
        if self.spec.sub.is_empty() {
            self.spec.primary_domain.clone()
        } else {
            format!("{}.{}", self.spec.sub, self.spec.primary_domain)
        }
    }

    /// Whether workloads in `namespace` may use this domain
    pub fn has_delegate(&self, namespace: &str) -> bool {
        self.spec
            .delegates
            .iter()
            .any(|d| d == "*" || d == namespace)
    }

    pub fn phase(&self) -> DomainPhase {
        self.status.as_ref().map(|s| s.phase).unwrap_or_default()
    }
}
