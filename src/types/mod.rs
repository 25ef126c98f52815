// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Platform custom resources.

pub mod domain;
pub mod release;

pub use domain::{Domain, DomainPhase, DomainSpec, DomainStatus};
pub use release::{Release, ReleaseSpec, SourceType};

use kube::Resource;

/// Make sure the labels and annotations maps exist so callers can insert into them.
pub fn initialize_metadata<K: Resource>(obj: &mut K) {
    let meta = obj.meta_mut();
    meta.labels.get_or_insert_with(Default::default);
    meta.annotations.get_or_insert_with(Default::default);
}
