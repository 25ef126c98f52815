// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Incremental decoding of a watch response body into typed events.

use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;
use std::marker::PhantomData;

use crate::client::codec::JsonCodec;
use crate::constants::defaults;
use crate::error::{BoxError, Error, RequestContext, Result, StatusBody};

/// One notification from a watch.
#[derive(Debug)]
pub enum WatchEvent<K> {
    Added(K),
    Modified(K),
    Deleted(K),
    /// Progress marker; the watch can be resumed from this resource version
    Bookmark { resource_version: String },
    /// The watch failed. This is always the last event of a session.
    Error(Error),
}

impl<K> WatchEvent<K> {
    /// Wire name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            WatchEvent::Added(_) => "ADDED",
            WatchEvent::Modified(_) => "MODIFIED",
            WatchEvent::Deleted(_) => "DELETED",
            WatchEvent::Bookmark { .. } => "BOOKMARK",
            WatchEvent::Error(_) => "ERROR",
        }
    }

    pub fn object(&self) -> Option<&K> {
        match self {
            WatchEvent::Added(obj) | WatchEvent::Modified(obj) | WatchEvent::Deleted(obj) => {
                Some(obj)
            }
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<K> {
        match self {
            WatchEvent::Added(obj) | WatchEvent::Modified(obj) | WatchEvent::Deleted(obj) => {
                Some(obj)
            }
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }
}

/// The `{type, object}` envelope as it appears on the wire. Key casing varies
/// between producers, so both spellings are accepted.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type", alias = "Type")]
    event_type: String,
    #[serde(alias = "Object", default)]
    object: serde_json::Value,
}

/// Reads envelopes one at a time off a byte stream.
///
/// Bytes past the end of the current envelope stay buffered for the next
/// call, so an object split across chunks, or several objects in one chunk,
/// decode the same way. An envelope is only re-parsed once a chunk arrives
/// that could close it, and the buffer is capped at `max_event_bytes`.
pub struct EventDecoder<K, S> {
    stream: S,
    buffer: BytesMut,
    /// The buffer may hold a complete envelope
    ready: bool,
    max_event_bytes: usize,
    codec: JsonCodec,
    context: RequestContext,
    phantom: PhantomData<fn() -> K>,
}

impl<K, S, E> EventDecoder<K, S>
where
    K: DeserializeOwned,
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Into<BoxError>,
{
    pub fn new(stream: S, codec: JsonCodec, context: RequestContext) -> Self {
        Self {
            stream,
            buffer: BytesMut::new(),
            ready: false,
            max_event_bytes: defaults::MAX_EVENT_BYTES,
            codec,
            context,
            phantom: PhantomData,
        }
    }

    /// Fail with a decode error once a single pending event grows past `max` bytes.
    pub fn with_max_event_bytes(mut self, max: usize) -> Self {
        self.max_event_bytes = max;
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Decode the next event.
    ///
    /// `Ok(None)` means the stream ended cleanly between envelopes. Malformed
    /// JSON, an unknown event type, a read error or an end of stream inside
    /// an envelope are errors; the stream cannot be resynchronized after one.
    pub async fn next_event(&mut self) -> Result<Option<WatchEvent<K>>> {
        loop {
            if self.ready {
                if let Some(envelope) = self.take_envelope()? {
                    return self.decode_event(envelope).map(Some);
                }
                self.ready = false;
            }

            if self.buffer.len() > self.max_event_bytes {
                return Err(Error::Decode {
                    context: self.context.clone(),
                    source: serde_json::Error::custom(format!(
                        "watch event exceeds {} bytes",
                        self.max_event_bytes
                    )),
                });
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => {
                    // Envelopes are objects, so only a closing brace can complete
                    // one; the start of an envelope is checked for garbage right away
                    self.ready = self.buffer.iter().all(u8::is_ascii_whitespace)
                        || chunk.contains(&b'}');
                    self.buffer.extend_from_slice(&chunk);
                }
                Some(Err(e)) => return Err(Error::transport(self.context.clone(), e)),
                None if self.buffer.iter().all(u8::is_ascii_whitespace) => return Ok(None),
                None => {
                    return Err(Error::Decode {
                        context: self.context.clone(),
                        source: serde_json::Error::custom(format!(
                            "watch stream ended inside an event ({} bytes pending)",
                            self.buffer.len()
                        )),
                    })
                }
            }
        }
    }

    /// Pop one complete envelope off the buffer, if one is there.
    fn take_envelope(&mut self) -> Result<Option<Envelope>> {
        let (decoded, consumed) = {
            let mut envelopes =
                serde_json::Deserializer::from_slice(&self.buffer).into_iter::<Envelope>();
            let decoded = envelopes.next();
            (decoded, envelopes.byte_offset())
        };

        match decoded {
            Some(Ok(envelope)) => {
                self.buffer.advance(consumed);
                Ok(Some(envelope))
            }
            // Incomplete envelope, wait for more bytes
            Some(Err(e)) if e.is_eof() => Ok(None),
            Some(Err(source)) => Err(Error::Decode {
                context: self.context.clone(),
                source,
            }),
            None => {
                self.buffer.clear();
                Ok(None)
            }
        }
    }

    fn decode_event(&self, envelope: Envelope) -> Result<WatchEvent<K>> {
        let Envelope { event_type, object } = envelope;

        match event_type.to_ascii_uppercase().as_str() {
            "ADDED" => Ok(WatchEvent::Added(self.codec.decode_value(&self.context, object)?)),
            "MODIFIED" => Ok(WatchEvent::Modified(
                self.codec.decode_value(&self.context, object)?,
            )),
            "DELETED" => Ok(WatchEvent::Deleted(
                self.codec.decode_value(&self.context, object)?,
            )),
            "BOOKMARK" => Ok(WatchEvent::Bookmark {
                resource_version: object
                    .pointer("/metadata/resourceVersion")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            }),
            "ERROR" => {
                let status: StatusBody = serde_json::from_value(object).unwrap_or_default();
                let code = if status.code == 0 { 500 } else { status.code };
                Ok(WatchEvent::Error(Error::from_status(
                    self.context.clone(),
                    code,
                    status,
                )))
            }
            other => Err(Error::Decode {
                context: self.context.clone(),
                source: serde_json::Error::custom(format!("unknown watch event type '{}'", other)),
            }),
        }
    }
}
