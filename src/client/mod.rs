// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Typed access to a single resource collection, including watches.

pub mod codec;
pub mod events;
pub mod params;
pub mod path;
pub mod resource;
pub mod watch;

pub use codec::JsonCodec;
pub use events::{EventSource, WatchSession};
pub use params::{DeleteOptions, ListOptions, PatchType, Preconditions, PropagationPolicy};
pub use path::{ResourceDescriptor, ResourcePath, ScopeExt};
pub use resource::{ResourceClient, ResourceList};
pub use watch::{EventDecoder, WatchEvent};
