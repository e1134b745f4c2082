// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::{
    api::{Api, Patch, PatchParams}, runtime::controller::Action, Client, Resource
};
use std::sync::Arc;
use std::fmt::Debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use s3_operator_common::telemetry::error;

use crate::controller::context::Context;
use crate::error::{ControllerError, Result};

pub static FIELD_MANAGER: &str = "s3.aws.crossplane.io";


/// Create a new kube client by inferring the kubeconfig from the environment
/// or the default service account
///
/// # Returns
/// A Result containing the kube Client or an error
pub async fn create_k8s_client() -> Result<Client> {
    Client::try_default().await.map_err(ControllerError::from)
}

/// Error policy to log the error and requeue the object after the configured
/// error interval
///
/// # Arguments
/// * `_object`: The object that caused the error
/// * `error`: The error that occurred
/// * `ctx`: The context of the controller
///
/// # Returns
/// An Action to requeue the object
pub fn error_policy<T>(_object: Arc<T>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    error!(
        event = "Error",
        error = %error,
    );
    Action::requeue(ctx.controller_config().error_requeue_after())
}

/// Patch a Resource
///
/// # Arguments
/// * `api`: The API client for the resource type
/// * `name`: The name of the object to patch
/// * `patch`: The patch to apply
///
/// # Returns
/// A Result containing the patched object or an error
pub async fn patch<T>(api: &Api<T>, name: &str, patch: &Patch<serde_json::Value>) -> Result<T>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Resource<DynamicType = ()>,
{
    api.patch(name, &PatchParams::apply(FIELD_MANAGER), patch).await.map_err(ControllerError::from)
}

/// Patch the status subresource of a Resource
///
/// # Arguments
/// * `api`: The API client for the resource type
/// * `name`: The name of the object to patch
/// * `patch`: The patch to apply to the status
///
/// # Returns
/// A Result containing the patched object or an error
pub async fn patch_status<T>(api: &Api<T>, name: &str, patch: &Patch<serde_json::Value>) -> Result<T>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Resource<DynamicType = ()>,
{
    api.patch_status(name, &PatchParams::apply(FIELD_MANAGER), patch).await.map_err(ControllerError::from)
}
