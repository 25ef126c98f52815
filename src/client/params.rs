// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Options forwarded to the API server with list, watch, delete and patch requests.

use serde::Serialize;

use crate::constants::content_type;

/// Selectors and bounds for list and watch requests. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub label_selector: Option<String>,
    pub field_selector: Option<String>,
    pub resource_version: Option<String>,
    /// `Exact` or `NotOlderThan`; only meaningful with `resource_version`
    pub resource_version_match: Option<String>,
    pub limit: Option<u32>,
    pub continue_token: Option<String>,
    pub timeout_seconds: Option<u32>,
    pub allow_watch_bookmarks: bool,
}

impl ListOptions {
    pub fn labels(mut self, selector: &str) -> Self {
        self.label_selector = Some(selector.to_string());
        self
    }

    pub fn fields(mut self, selector: &str) -> Self {
        self.field_selector = Some(selector.to_string());
        self
    }

    /// Start from (or resume at) the given resource version
    pub fn at(mut self, resource_version: &str) -> Self {
        self.resource_version = Some(resource_version.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn continue_token(mut self, token: &str) -> Self {
        self.continue_token = Some(token.to_string());
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn bookmarks(mut self, enabled: bool) -> Self {
        self.allow_watch_bookmarks = enabled;
        self
    }

    /// Query parameters for a list request
    pub fn list_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.common_query();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(token) = &self.continue_token {
            pairs.push(("continue", token.clone()));
        }
        pairs
    }

    /// Query parameters for a watch request. Paging does not apply to watches.
    pub fn watch_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("watch", "true".to_string())];
        pairs.extend(self.common_query());
        if self.allow_watch_bookmarks {
            pairs.push(("allowWatchBookmarks", "true".to_string()));
        }
        pairs
    }

    fn common_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(selector) = &self.label_selector {
            pairs.push(("labelSelector", selector.clone()));
        }
        if let Some(selector) = &self.field_selector {
            pairs.push(("fieldSelector", selector.clone()));
        }
        if let Some(rv) = &self.resource_version {
            pairs.push(("resourceVersion", rv.clone()));
        }
        if let Some(rv_match) = &self.resource_version_match {
            pairs.push(("resourceVersionMatch", rv_match.clone()));
        }
        if let Some(seconds) = self.timeout_seconds {
            pairs.push(("timeoutSeconds", seconds.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropagationPolicy {
    Orphan,
    Background,
    Foreground,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Body sent with delete requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation_policy: Option<PropagationPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preconditions: Option<Preconditions>,
    #[serde(skip_serializing_if = "std::ops::Not::not", serialize_with = "dry_run_all")]
    pub dry_run: bool,
}

fn dry_run_all<S: serde::Serializer>(_: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(["All"])
}

impl DeleteOptions {
    pub fn grace_period(mut self, seconds: u32) -> Self {
        self.grace_period_seconds = Some(seconds);
        self
    }

    pub fn propagation(mut self, policy: PropagationPolicy) -> Self {
        self.propagation_policy = Some(policy);
        self
    }

    /// Only delete if the stored object still has this resource version
    pub fn if_version(mut self, resource_version: &str) -> Self {
        self.preconditions
            .get_or_insert_with(Preconditions::default)
            .resource_version = Some(resource_version.to_string());
        self
    }

    /// The JSON body, wrapped the way the API server expects a `DeleteOptions` object.
    pub fn to_body(&self) -> serde_json::Result<serde_json::Value> {
        let mut body = serde_json::to_value(self)?;
        if let Some(map) = body.as_object_mut() {
            map.insert("apiVersion".to_string(), "v1".into());
            map.insert("kind".to_string(), "DeleteOptions".into());
        }
        Ok(body)
    }
}

/// Diff semantics of a patch request, selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchType {
    /// RFC 6902 JSON patch
    Json,
    /// RFC 7386 JSON merge patch
    Merge,
    StrategicMerge,
}

impl PatchType {
    pub fn content_type(&self) -> &'static str {
        match self {
            PatchType::Json => content_type::JSON_PATCH,
            PatchType::Merge => content_type::MERGE_PATCH,
            PatchType::StrategicMerge => content_type::STRATEGIC_MERGE_PATCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_list_options_send_nothing() {
        assert!(ListOptions::default().list_query().is_empty());
    }

    #[test]
    fn test_list_query_includes_selectors_and_paging() {
        let options = ListOptions::default()
            .labels("app=web")
            .fields("metadata.name=v1")
            .at("1200")
            .limit(50)
            .continue_token("abc");

        assert_eq!(
            options.list_query(),
            vec![
                ("labelSelector", "app=web".to_string()),
                ("fieldSelector", "metadata.name=v1".to_string()),
                ("resourceVersion", "1200".to_string()),
                ("limit", "50".to_string()),
                ("continue", "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_watch_query_sets_watch_and_drops_paging() {
        let options = ListOptions::default()
            .labels("app=web")
            .limit(50)
            .continue_token("abc")
            .timeout(290)
            .bookmarks(true);

        assert_eq!(
            options.watch_query(),
            vec![
                ("watch", "true".to_string()),
                ("labelSelector", "app=web".to_string()),
                ("timeoutSeconds", "290".to_string()),
                ("allowWatchBookmarks", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_delete_options_body() {
        let body = DeleteOptions::default().to_body().unwrap();
        assert_eq!(body, json!({"apiVersion": "v1", "kind": "DeleteOptions"}));
    }

    #[test]
    fn test_delete_options_body_with_all_fields() {
        let options = DeleteOptions {
            dry_run: true,
            ..DeleteOptions::default()
                .grace_period(0)
                .propagation(PropagationPolicy::Foreground)
                .if_version("42")
        };

        assert_eq!(
            options.to_body().unwrap(),
            json!({
                "apiVersion": "v1",
                "kind": "DeleteOptions",
                "gracePeriodSeconds": 0,
                "propagationPolicy": "Foreground",
                "preconditions": {"resourceVersion": "42"},
                "dryRun": ["All"],
            })
        );
    }

    #[test]
    fn test_patch_content_types() {
        assert_eq!(PatchType::Json.content_type(), "application/json-patch+json");
        assert_eq!(PatchType::Merge.content_type(), "application/merge-patch+json");
        assert_eq!(
            PatchType::StrategicMerge.content_type(),
            "application/strategic-merge-patch+json"
        );
    }
}
