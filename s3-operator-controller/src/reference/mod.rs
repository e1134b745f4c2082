// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

//! Resolution of references between managed resources.
//!
//! A managed resource may point at another resource by name ([`Reference`])
//! or by labels ([`Selector`]) instead of by the provider value it actually
//! needs. Before the resource is applied, each such slot is resolved into
//! the concrete value extracted from the referenced resource.

pub mod error;
pub mod reader;
pub mod resolver;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use kube::Resource;
use tokio_util::sync::CancellationToken;

use crate::crd::{ClusterCustomResource, common::{self, Reference, Selector}, v1alpha1::iam_user::{self, IAMUser}};
use crate::reference::{error::ReferenceResult, reader::ResourceReader, resolver::ApiResolver};

/// Extracts the value a reference resolves to from the referenced resource
pub type ExtractValueFn<K> = fn(&K) -> String;

/// Extract the external name of the referenced resource
pub fn external_name<K: Resource>() -> ExtractValueFn<K> {
    common::external_name::<K>
}

/// Extract the provider assigned ARN of the referenced IAMUser
pub fn iam_user_arn() -> ExtractValueFn<IAMUser> {
    iam_user::iam_user_arn
}

/// A request to resolve one reference slot against resources of kind `K`
pub struct ResolutionRequest<K> {
    pub current_value: String,
    pub reference: Option<Reference>,
    pub selector: Option<Selector>,
    pub extract: ExtractValueFn<K>,
}

impl<K> ResolutionRequest<K> {
    /// Values that are already set are never re-resolved; clearing the value
    /// triggers a new resolution. Nothing can be resolved without either a
    /// reference or a selector.
    pub fn is_no_op(&self) -> bool {
        !self.current_value.is_empty() || (self.reference.is_none() && self.selector.is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolutionResponse {
    pub resolved_value: String,
    pub resolved_reference: Option<Reference>,
}

impl ResolutionResponse {
    /// The resolved value as an optional field, `None` when nothing was
    /// resolved
    pub fn value(&self) -> Option<String> {
        from_value(&self.resolved_value)
    }
}

/// Convert an optional field into the current value of a request
pub fn to_value(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn from_value(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Resolves a single reference slot
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve<K>(&self, token: &CancellationToken, request: ResolutionRequest<K>) -> ReferenceResult<ResolutionResponse>
    where
        K: ClusterCustomResource;
}

/// A managed resource with reference slots to resolve before it is applied
#[async_trait]
pub trait ResolveReferences: Resource + Sized + Send + Sync {
    /// Resolve every reference slot of the resource in place using `resolver`.
    /// Slots are resolved in order and the first error is returned as is.
    async fn resolve_references_with<S>(&mut self, token: &CancellationToken, resolver: &S) -> ReferenceResult<()>
    where
        S: Resolve;

    /// The spec fields written by resolution, as a merge patch of the spec.
    /// Only the resolved slots are included so that the rest of the stored
    /// spec is never rewritten.
    fn resolved_spec(&self) -> serde_json::Value;

    /// Resolve every reference slot against the resources visible to `reader`
    async fn resolve_references<R>(&mut self, token: &CancellationToken, reader: &R) -> ReferenceResult<()>
    where
        R: ResourceReader,
    {
        let resolver = ApiResolver::new(reader, &*self);
        self.resolve_references_with(token, &resolver).await
    }
}
