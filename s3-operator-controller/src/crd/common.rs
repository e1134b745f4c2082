// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use chrono::{DateTime, Utc};
use kube::{Resource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt::{Display, Formatter, Result as FmtResult}};

/// Annotation holding the name of a resource in the external system
pub static EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Return the external name of a resource, or an empty string if it has none
pub fn external_name<K: Resource>(resource: &K) -> String {
    resource
        .annotations()
        .get(EXTERNAL_NAME_ANNOTATION)
        .cloned()
        .unwrap_or_default()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Reference {
    /// Name of the referenced object
    pub name: String,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Reference { name: name.into() }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Selects an object with matching labels
    pub match_labels: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Selects an object with the same controller reference as the selecting object
    pub match_controller_ref: Option<bool>,
}

impl Selector {
    pub fn controllers_must_match(&self) -> bool {
        self.match_controller_ref.unwrap_or(false)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct SecretReference {
    /// Name of the secret
    pub name: String,
    /// Namespace of the secret
    pub namespace: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
pub enum DeletionPolicy {
    /// Delete the external resource when the managed resource is deleted
    #[default]
    Delete,
    /// Leave the external resource in place when the managed resource is deleted
    Orphan,
}

/// Fields shared by the spec of every managed resource
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "writeConnectionSecretToRef")]
    /// Secret to which connection details of this resource are written
    pub write_connection_secret_to_reference: Option<SecretReference>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "providerRef")]
    /// Deprecated, use providerConfigRef
    pub provider_reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "providerConfigRef")]
    /// Provider configuration used to connect to the external system
    pub provider_config_reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// What happens to the external resource when this resource is deleted
    pub deletion_policy: Option<DeletionPolicy>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum ConditionType {
    Ready,
    Synced,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum ConditionReason {
    ReconcileSuccess,
    ReconcileError,
}

impl Display for ConditionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConditionReason::ReconcileSuccess => write!(f, "ReconcileSuccess"),
            ConditionReason::ReconcileError => write!(f, "ReconcileError"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: ConditionType,
    pub status: ConditionStatus,
    pub last_transition_time: DateTime<Utc>,
    pub reason: ConditionReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// The last attempt to reconcile the resource succeeded
    pub fn reconcile_success() -> Self {
        Condition {
            type_: ConditionType::Synced,
            status: ConditionStatus::True,
            last_transition_time: Utc::now(),
            reason: ConditionReason::ReconcileSuccess,
            message: None,
        }
    }

    /// The last attempt to reconcile the resource failed with `error`
    pub fn reconcile_error(error: &impl Display) -> Self {
        Condition {
            type_: ConditionType::Synced,
            status: ConditionStatus::False,
            last_transition_time: Utc::now(),
            reason: ConditionReason::ReconcileError,
            message: Some(error.to_string()),
        }
    }

    /// Whether two conditions are the same, ignoring when they were observed
    pub fn equal(&self, other: &Self) -> bool {
        self.type_ == other.type_
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Fields shared by the status of every managed resource
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct ResourceStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Conditions of the resource
    pub conditions: Vec<Condition>,
}

impl ResourceStatus {
    pub fn condition(&self, type_: ConditionType) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.type_ == type_)
    }

    /// Set the supplied conditions, replacing any existing condition of the
    /// same type. An unchanged condition keeps its original transition time.
    pub fn set_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        for condition in conditions {
            match self.conditions.iter_mut().find(|c| c.type_ == condition.type_) {
                Some(existing) if existing.equal(&condition) => (),
                Some(existing) => *existing = condition,
                None => self.conditions.push(condition),
            }
        }
    }
}

/// A resource managed by the operator
pub trait Managed {
    fn resource_status(&self) -> Option<&ResourceStatus>;
}
