// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::{core::object::ObjectList, CustomResource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::common::{Managed, ResourceSpec, ResourceStatus};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    kind = "IAMUser",
    group = "identity.aws.crossplane.io",
    version = "v1alpha1",
    status = "IAMUserStatus",
    doc = "An IAMUser is a managed resource that represents an AWS IAM User.",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "aws",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"AGE", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct IAMUserSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    #[serde(default)]
    pub for_provider: IAMUserParameters,
}

pub type IAMUserList = ObjectList<IAMUser>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IAMUserParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The path for the user name
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// ARN of the policy used to set the permissions boundary for the user
    pub permissions_boundary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Tags to attach to the user
    pub tags: Vec<IAMUserTag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct IAMUserTag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IAMUserStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
    #[serde(default)]
    pub at_provider: IAMUserObservation,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct IAMUserObservation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    /// The Amazon Resource Name that identifies the user
    pub arn: String,
    #[serde(default, rename = "userID", skip_serializing_if = "String::is_empty")]
    /// The stable and unique identifier of the user
    pub user_id: String,
}

impl Managed for IAMUser {
    fn resource_status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref().map(|status| &status.resource_status)
    }
}

/// The ARN assigned to the user by the provider, empty until observed
pub fn iam_user_arn(user: &IAMUser) -> String {
    user.status
        .as_ref()
        .map(|status| status.at_provider.arn.clone())
        .unwrap_or_default()
}
