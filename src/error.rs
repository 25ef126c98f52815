// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The API verb a request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    List,
    Get,
    Create,
    Update,
    Delete,
    Patch,
    Watch,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Verb::List => "list",
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::Delete => "delete",
            Verb::Patch => "patch",
            Verb::Watch => "watch",
        };
        f.write_str(verb)
    }
}

/// Identifies the request that failed: verb, resource and (when known) namespace and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub verb: Verb,
    pub resource: String,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

impl RequestContext {
    pub fn new(verb: Verb, resource: &str, namespace: Option<&str>, name: Option<&str>) -> Self {
        Self {
            verb,
            resource: resource.to_string(),
            namespace: namespace.map(str::to_string),
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.resource)?;
        match (&self.namespace, &self.name) {
            (Some(ns), Some(name)) => write!(f, " {}/{}", ns, name),
            (None, Some(name)) => write!(f, " {}", name),
            (Some(ns), None) => write!(f, " in namespace {}", ns),
            (None, None) => Ok(()),
        }
    }
}

/// The `Status` object the API server returns alongside non-success responses
/// and inside `ERROR` watch events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusBody {
    pub status: String,
    pub message: String,
    pub reason: String,
    pub code: u16,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{context}: not found: {message}")]
    NotFound { context: RequestContext, message: String },

    #[error("{context}: conflict: {message}")]
    Conflict { context: RequestContext, message: String },

    #[error("{context}: rejected as invalid: {message}")]
    Invalid { context: RequestContext, message: String },

    #[error("{context}: invalid argument: {message}")]
    InvalidArgument { context: RequestContext, message: String },

    #[error("{context}: resource version expired: {message}")]
    Expired { context: RequestContext, message: String },

    #[error("{context}: API error {code} ({reason}): {message}")]
    Api {
        context: RequestContext,
        code: u16,
        reason: String,
        message: String,
    },

    #[error("{context}: transport error: {source}")]
    Transport {
        context: RequestContext,
        #[source]
        source: BoxError,
    },

    #[error("{context}: timed out after {after:?}")]
    Timeout { context: RequestContext, after: Duration },

    #[error("{context}: failed to decode response: {source}")]
    Decode {
        context: RequestContext,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: failed to encode request body: {source}")]
    Encode {
        context: RequestContext,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid resource descriptor: {0}")]
    InvalidResource(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Map a non-success HTTP status and its `Status` body onto the error taxonomy.
    pub fn from_status(context: RequestContext, code: u16, status: StatusBody) -> Self {
        let StatusBody { message, reason, .. } = status;
        match code {
            404 => Error::NotFound { context, message },
            409 => Error::Conflict { context, message },
            400 | 422 => Error::Invalid { context, message },
            410 => Error::Expired { context, message },
            _ => Error::Api {
                context,
                code,
                reason,
                message,
            },
        }
    }

    /// Build an error from a raw error response body. Bodies that are not a
    /// `Status` object are kept verbatim as the message.
    pub fn from_response(context: RequestContext, code: u16, body: &[u8]) -> Self {
        let status = serde_json::from_slice::<StatusBody>(body)
            .ok()
            .filter(|s| !s.message.is_empty() || !s.reason.is_empty())
            .unwrap_or_else(|| StatusBody {
                message: String::from_utf8_lossy(body).trim().to_string(),
                code,
                ..Default::default()
            });
        Self::from_status(context, code, status)
    }

    pub fn transport(context: RequestContext, source: impl Into<BoxError>) -> Self {
        Error::Transport {
            context,
            source: source.into(),
        }
    }

    pub fn context(&self) -> Option<&RequestContext> {
        match self {
            Error::NotFound { context, .. }
            | Error::Conflict { context, .. }
            | Error::Invalid { context, .. }
            | Error::InvalidArgument { context, .. }
            | Error::Expired { context, .. }
            | Error::Api { context, .. }
            | Error::Transport { context, .. }
            | Error::Timeout { context, .. }
            | Error::Decode { context, .. }
            | Error::Encode { context, .. } => Some(context),
            Error::InvalidResource(_) => None,
        }
    }

    /// The HTTP status code the server answered with, if the error came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Conflict { .. } => Some(409),
            Error::Expired { .. } => Some(410),
            Error::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}
