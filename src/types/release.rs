// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A compiled slug version of an application
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[kube(group = "platform.koli.io", version = "v1", kind = "Release")]
#[kube(namespaced)]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseSpec {
    /// URL of the git remote to download the revision tarball from
    pub git_remote: String,
    pub git_revision: String,
    pub git_repository: String,
    pub build_revision: String,
    pub auto_deploy: bool,
    pub expire_after: i32,
    pub deploy_name: String,
    pub build: bool,
    /// Expirable token used by the builder
    pub auth_token: String,
    pub source_type: SourceType,
}

/// Where the build came from. Releases without a source carry an empty string.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum SourceType {
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Pushed through a webhook
    #[serde(rename = "github")]
    GitHub,
    /// Pushed to the local git server
    #[serde(rename = "local")]
    GitLocal,
}

impl Release {
    /// Whether the release should be rolled out as soon as it is built
    pub fn should_auto_deploy(&self) -> bool {
        self.spec.auto_deploy && !self.spec.deploy_name.is_empty()
    }

    /// Short form of the git revision, as shown in logs
    pub fn short_revision(&self) -> &str {
        let revision = self.spec.git_revision.as_str();
        revision.get(..7).unwrap_or(revision)
    }
}
