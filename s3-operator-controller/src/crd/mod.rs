// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

pub mod common;
pub mod utils;
pub mod v1alpha1;
pub mod v1alpha3;
pub mod v1beta1;

use kube::{Resource, CustomResourceExt, core::object::{HasStatus, HasSpec}};
use k8s_openapi::ClusterResourceScope;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

pub trait ClusterCustomResource:
    Clone
        + Resource<Scope = ClusterResourceScope, DynamicType = ()>
        + CustomResourceExt
        + HasStatus
        + HasSpec
        + JsonSchema
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{}

impl<T> ClusterCustomResource for T
where
    T: Clone
        + Resource<Scope = ClusterResourceScope, DynamicType = ()>
        + CustomResourceExt
        + HasStatus
        + HasSpec
        + JsonSchema
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{}
