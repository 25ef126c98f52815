// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! JSON codec handed to every client at construction.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::content_type;
use crate::error::{Error, RequestContext, Result};

/// Encodes request bodies and decodes responses and watch payloads.
///
/// Clients receive their codec explicitly; there is no process-wide type registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn content_type(&self) -> &'static str {
        content_type::JSON
    }

    pub fn encode<T: Serialize>(&self, context: &RequestContext, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|source| Error::Encode {
            context: context.clone(),
            source,
        })
    }

    pub fn decode<T: DeserializeOwned>(&self, context: &RequestContext, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|source| Error::Decode {
            context: context.clone(),
            source,
        })
    }

    /// Decode an already parsed JSON value, as found inside a watch envelope.
    pub fn decode_value<T: DeserializeOwned>(
        &self,
        context: &RequestContext,
        value: serde_json::Value,
    ) -> Result<T> {
        serde_json::from_value(value).map_err(|source| Error::Decode {
            context: context.clone(),
            source,
        })
    }
}
