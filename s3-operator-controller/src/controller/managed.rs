// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::{
    api::{Api, Patch, ResourceExt},
    runtime::{
        controller::{Action, Controller},
        watcher,
    },
};
use std::sync::Arc;
use serde_json::json;

use s3_operator_common::telemetry::{info, warn};

use crate::controller::{context::Context, traits::ManagedResource, utils::{patch, patch_status}};
use crate::crd::common::{Condition, Managed};
use crate::error::{ControllerError, Result};
use crate::reference::{ResolveReferences, error::ReferenceError, reader::KubeReader};


pub struct ManagedController;

impl ManagedController {
    /// Create a new controller for a managed resource
    ///
    /// # Arguments
    /// * `ctx` - The controller context
    ///
    /// # Returns
    /// The controller for the managed resource
    pub async fn create_controller<T>(ctx: Arc<Context>) -> Controller<T>
    where
        T: ManagedResource,
    {
        let api = Api::<T>::all(ctx.client.clone());

        Controller::new(api, watcher::Config::default())
            .shutdown_on_signal()
    }

    /// Reconcile a managed resource
    ///
    /// Resolves the references of the resource and writes the resolved values
    /// back to its spec. The Synced condition records the outcome.
    ///
    /// # Arguments
    /// * `resource` - The managed resource to reconcile
    /// * `ctx` - The controller context
    ///
    /// # Returns
    /// An action to take after reconciling the resource
    pub async fn reconcile<T>(resource: Arc<T>, ctx: Arc<Context>) -> Result<Action>
    where
        T: ManagedResource,
    {
        let kind = T::kind(&()).to_string();
        let name = resource.name_any();
        let api = Api::<T>::all(ctx.client.clone());
        let reader = KubeReader::new(ctx.client.clone());

        let mut resolved = (*resource).clone();
        if let Err(e) = resolved.resolve_references(&ctx.shutdown, &reader).await {
            warn!(
                event = "ResolvingReferencesFailed",
                kind = kind.as_str(),
                name = name.as_str(),
                error = %e,
            );
            let status = update_status(&api, resource.as_ref(), Condition::reconcile_error(&e)).await;
            return Err(resolution_failure(&kind, &name, e, status));
        }

        if resolved != *resource {
            info!(
                event = "ApplyingResolvedReferences",
                kind = kind.as_str(),
                name = name.as_str(),
            );
            patch(&api, &name, &resolved_spec_patch(&resolved)).await?;
        }

        for warning in resolved.warnings() {
            warn!(
                event = "InvalidDesiredState",
                kind = kind.as_str(),
                name = name.as_str(),
                warning = warning.as_str(),
            );
        }

        update_status(&api, resource.as_ref(), Condition::reconcile_success()).await?;

        Ok(Action::requeue(ctx.controller_config().requeue_after()))
    }
}

/// The error reported for a failed resolution. A failure to record it on the
/// status is only logged.
fn resolution_failure(kind: &str, name: &str, error: ReferenceError, status: Result<()>) -> ControllerError {
    if let Err(status_error) = status {
        warn!(
            event = "UpdatingStatusFailed",
            kind = kind,
            name = name,
            error = %status_error,
        );
    }
    error.into()
}

/// Merge patch writing back the spec fields changed by reference resolution
fn resolved_spec_patch<T>(resolved: &T) -> Patch<serde_json::Value>
where
    T: ManagedResource,
{
    Patch::Merge(json!({
        "spec": resolved.resolved_spec(),
    }))
}

/// Set a condition on the status of a managed resource, skipping the update
/// when the condition is already present
///
/// # Arguments
/// * `api` - The API client for the resource type
/// * `resource` - The resource to update
/// * `condition` - The condition to set
///
/// # Returns
/// A result indicating success or failure
async fn update_status<T>(api: &Api<T>, resource: &T, condition: Condition) -> Result<()>
where
    T: ManagedResource,
{
    let kind = T::kind(&()).to_string();
    let name = resource.name_any();
    let mut status = resource.resource_status().cloned().unwrap_or_default();

    if status.condition(condition.type_).is_some_and(|current| current.equal(&condition)) {
        return Ok(());
    }
    status.set_conditions([condition]);

    info!(
        event = "UpdatingStatus",
        kind = kind.as_str(),
        name = name.as_str(),
    );
    patch_status(api, &name, &Patch::Merge(json!({
        "status": status,
    }))).await?;

    Ok(())
}
