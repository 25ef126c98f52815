// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Push-based event delivery for an open watch.

use bytes::Bytes;
use futures::Stream;
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::client::watch::{EventDecoder, WatchEvent};
use crate::error::BoxError;

/// A source of events that keeps producing until it is told to stop.
pub trait EventSource: Stream + Unpin {
    /// Stop producing events. Calling this more than once has no further effect.
    fn stop(&mut self);

    fn is_stopped(&self) -> bool;
}

/// An open watch.
///
/// A dedicated task owns the connection and decodes events into a bounded
/// channel of `watch_buffer` entries. When the consumer falls behind the
/// task waits for room, so events are never dropped and at most
/// `watch_buffer` of them are held in memory.
///
/// The session yields events in the order they were decoded and ends after
/// an `Error` event, when the server closes the stream, or once closed.
/// Dropping the session closes it.
pub struct WatchSession<K> {
    events: mpsc::Receiver<WatchEvent<K>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    closed: bool,
    _guard: DropGuard,
}

impl<K> WatchSession<K>
where
    K: DeserializeOwned + Send + 'static,
{
    /// Start the task reading events off `decoder`.
    pub fn spawn<S, E>(decoder: EventDecoder<K, S>, buffer: usize) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Unpin + Send + 'static,
        E: Into<BoxError> + Send + 'static,
    {
        let (tx, events) = mpsc::channel(buffer.max(1));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(stream_events(decoder, tx, cancel.clone()));

        Self {
            events,
            _guard: cancel.clone().drop_guard(),
            cancel,
            task: Some(task),
            closed: false,
        }
    }
}

impl<K> WatchSession<K> {
    /// Close the watch. The connection is released by the reading task as it
    /// stops; no event is yielded afterwards. Closing again is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();
        self.events.close();
        debug!("Watch session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the watch and wait until the reading task has released the connection.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Watch task ended abnormally: {}", e);
            }
        }
    }
}

impl<K> Stream for WatchSession<K> {
    type Item = WatchEvent<K>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(None);
        }
        this.events.poll_recv(cx)
    }
}

impl<K> EventSource for WatchSession<K> {
    fn stop(&mut self) {
        self.close();
    }

    fn is_stopped(&self) -> bool {
        self.is_closed()
    }
}

/// Decode events until the stream ends, an error is delivered, or the
/// session is cancelled. Owns the connection for its whole life.
async fn stream_events<K, S, E>(
    mut decoder: EventDecoder<K, S>,
    tx: mpsc::Sender<WatchEvent<K>>,
    cancel: CancellationToken,
) where
    K: DeserializeOwned,
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Into<BoxError>,
{
    loop {
        let decoded = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            decoded = decoder.next_event() => decoded,
        };

        let event = match decoded {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!("Watch on {} ended by the server", decoder.context());
                break;
            }
            Err(e) => {
                warn!("Watch on {} failed: {}", decoder.context(), e);
                WatchEvent::Error(e)
            }
        };
        let terminal = event.is_error();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(event) => {
                if sent.is_err() {
                    break;
                }
            }
        }

        if terminal {
            break;
        }
    }

    debug!("Releasing watch connection for {}", decoder.context());
    // The connection is released before the channel closes.
    drop(decoder);
}
