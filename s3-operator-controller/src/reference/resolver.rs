// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use async_trait::async_trait;
use kube::{Resource, ResourceExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;

use s3_operator_common::telemetry::debug;

use crate::crd::{ClusterCustomResource, common::Reference};
use crate::reference::{
    Resolve, ResolutionRequest, ResolutionResponse,
    error::{ReferenceError, ReferenceResult},
    reader::ResourceReader,
};

/// What the resolver needs to know about the resource holding the references
#[derive(Debug, Clone, Default)]
struct Referencer {
    deleted: bool,
    controller_uid: Option<String>,
}

impl Referencer {
    fn from_resource<F: Resource>(resource: &F) -> Self {
        Referencer {
            deleted: resource.meta().deletion_timestamp.is_some(),
            controller_uid: controller_uid(resource),
        }
    }

    fn has_same_controller<K: Resource>(&self, candidate: &K) -> bool {
        match (&self.controller_uid, controller_uid(candidate)) {
            (Some(uid), Some(candidate_uid)) => *uid == candidate_uid,
            _ => false,
        }
    }
}

fn controller_uid<K: Resource>(resource: &K) -> Option<String> {
    resource
        .owner_references()
        .iter()
        .find(|owner| owner.controller == Some(true))
        .map(|owner| owner.uid.clone())
}

/// Resolves references by reading candidates through a [`ResourceReader`]
pub struct ApiResolver<'a, R> {
    reader: &'a R,
    from: Referencer,
}

impl<'a, R> ApiResolver<'a, R>
where
    R: ResourceReader,
{
    /// Create a resolver for the references held by `from`
    pub fn new<F: Resource>(reader: &'a R, from: &F) -> Self {
        Self {
            reader,
            from: Referencer::from_resource(from),
        }
    }
}

#[async_trait]
impl<'a, R> Resolve for ApiResolver<'a, R>
where
    R: ResourceReader,
{
    async fn resolve<K>(&self, token: &CancellationToken, request: ResolutionRequest<K>) -> ReferenceResult<ResolutionResponse>
    where
        K: ClusterCustomResource,
    {
        let kind = K::kind(&()).to_string();

        // Nothing to do for a resource on its way out, or for a request that
        // is already satisfied.
        if self.from.deleted || request.is_no_op() {
            return Ok(ResolutionResponse {
                resolved_value: request.current_value,
                resolved_reference: request.reference,
            });
        }

        // An explicit reference takes precedence over the selector.
        if let Some(reference) = request.reference {
            let managed = until_cancelled(token, async {
                self.reader
                    .get::<K>(&reference.name)
                    .await
                    .map_err(ReferenceError::GetManagedError)
            }).await?;

            debug!(
                event = "ReferenceResolved",
                kind = kind.as_str(),
                name = reference.name.as_str(),
            );
            return Ok(ResolutionResponse {
                resolved_value: (request.extract)(&managed),
                resolved_reference: Some(reference),
            });
        }

        let selector = request.selector.unwrap_or_default();
        let match_labels = selector.match_labels.clone().unwrap_or_default();
        let candidates = until_cancelled(token, async {
            self.reader
                .list::<K>(&match_labels)
                .await
                .map_err(ReferenceError::ListManagedError)
        }).await?;

        let selected = candidates
            .iter()
            .find(|candidate| !selector.controllers_must_match() || self.from.has_same_controller(*candidate));

        match selected {
            Some(candidate) => {
                debug!(
                    event = "ReferenceSelected",
                    kind = kind.as_str(),
                    name = candidate.name_any().as_str(),
                );
                Ok(ResolutionResponse {
                    resolved_value: (request.extract)(candidate),
                    resolved_reference: Some(Reference::new(candidate.name_any())),
                })
            },
            None => {
                debug!(event = "NoReferenceSelected", kind = kind.as_str());
                Ok(ResolutionResponse::default())
            },
        }
    }
}

/// Run `future` unless `token` is cancelled first
async fn until_cancelled<T, F>(token: &CancellationToken, future: F) -> ReferenceResult<T>
where
    F: Future<Output = ReferenceResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ReferenceError::CancelledError),
        result = future => result,
    }
}
