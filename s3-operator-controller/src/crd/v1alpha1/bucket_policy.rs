// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use async_trait::async_trait;
use kube::{core::object::ObjectList, CustomResource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::crd::common::{Managed, Reference, ResourceSpec, ResourceStatus, Selector};
use crate::crd::v1alpha1::iam_user::IAMUser;
use crate::crd::v1alpha3::policy::{PolicyError, S3BucketPolicy, S3BucketPolicyStatement};
use crate::crd::v1beta1::bucket::Bucket;
use crate::reference::{
    external_name, iam_user_arn, to_value, Resolve, ResolveReferences, ResolutionRequest,
    error::ReferenceResult,
};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    kind = "BucketPolicy",
    group = "s3.aws.crossplane.io",
    version = "v1alpha1",
    status = "BucketPolicyStatus",
    doc = "A BucketPolicy is a managed resource that represents the policy attached to an AWS S3 Bucket.",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "aws",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"AGE", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BucketPolicySpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    #[serde(rename = "forProvider")]
    pub policy_body: BucketPolicyParameters,
}

pub type BucketPolicyList = ObjectList<BucketPolicy>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct BucketPolicyStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
}

impl Managed for BucketPolicy {
    fn resource_status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref().map(|status| &status.resource_status)
    }
}

/// The policy document of a bucket, and the bucket and user it applies to
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketPolicyParameters {
    #[serde(rename = "version")]
    /// The current IAM policy version
    pub policy_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "id")]
    /// The policy's optional identifier
    pub policy_id: Option<String>,
    #[serde(default, rename = "statement")]
    /// The statements of the policy
    pub policy_statement: Vec<S3BucketPolicyStatement>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "userNameARN")]
    /// ARN of the IAM user that statements flagged `EffectIAMUser` apply to
    pub user_name_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "userNameARNRef")]
    /// Reference to the IAMUser to retrieve the ARN from
    pub user_name_arn_ref: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "userNameARNSelector")]
    /// Selects an IAMUser to retrieve the ARN from
    pub user_name_arn_selector: Option<Selector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Name of the bucket the policy is attached to
    pub bucket_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Reference to the Bucket to retrieve the name from
    pub bucket_name_ref: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Selects a Bucket to retrieve the name from
    pub bucket_name_selector: Option<Selector>,
}

impl BucketPolicyParameters {
    /// Render the policy document sent to the provider. Statements flagged
    /// to apply to the IAM user get the resolved user ARN as an explicit
    /// principal.
    pub fn policy_document(&self) -> Result<S3BucketPolicy, PolicyError> {
        let user_arn = self.user_name_arn.as_deref().unwrap_or_default();
        let mut statements = self.policy_statement.clone();

        for (index, statement) in statements.iter_mut().enumerate() {
            if !statement.apply_to_iam_user {
                continue;
            }
            if user_arn.is_empty() {
                return Err(PolicyError::MissingUserArnError(index));
            }
            if !statement.principal.aws_principal.iter().any(|arn| arn == user_arn) {
                statement.principal.aws_principal.push(user_arn.to_string());
            }
        }

        Ok(S3BucketPolicy {
            policy_version: self.policy_version.clone(),
            policy_id: self.policy_id.clone(),
            policy_statement: statements,
        })
    }
}

#[async_trait]
impl ResolveReferences for BucketPolicy {
    async fn resolve_references_with<S>(&mut self, token: &CancellationToken, resolver: &S) -> ReferenceResult<()>
    where
        S: Resolve,
    {
        let body = &mut self.spec.policy_body;

        let rsp = resolver.resolve(token, ResolutionRequest::<Bucket> {
            current_value: to_value(&body.bucket_name),
            reference: body.bucket_name_ref.clone(),
            selector: body.bucket_name_selector.clone(),
            extract: external_name(),
        }).await?;
        body.bucket_name = rsp.value();
        body.bucket_name_ref = rsp.resolved_reference;

        let rsp = resolver.resolve(token, ResolutionRequest::<IAMUser> {
            current_value: to_value(&body.user_name_arn),
            reference: body.user_name_arn_ref.clone(),
            selector: body.user_name_arn_selector.clone(),
            extract: iam_user_arn(),
        }).await?;
        body.user_name_arn = rsp.value();
        body.user_name_arn_ref = rsp.resolved_reference;

        Ok(())
    }

    fn resolved_spec(&self) -> Value {
        let body = &self.spec.policy_body;

        json!({
            "forProvider": {
                "bucketName": body.bucket_name,
                "bucketNameRef": body.bucket_name_ref,
                "userNameARN": body.user_name_arn,
                "userNameARNRef": body.user_name_arn_ref,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kube::Resource;
    use std::sync::Mutex;

    use crate::crd::ClusterCustomResource;
    use crate::crd::v1alpha3::policy::S3BucketPrincipal;
    use crate::reference::{ResolutionResponse, error::{ReaderError, ReferenceError}};
    use crate::reference::testing::{bucket, iam_user, MemoryReader};

    const USER_ARN: &str = "arn:aws:iam::123:user/x";

    fn policy(body: BucketPolicyParameters) -> BucketPolicy {
        BucketPolicy::new("policy", BucketPolicySpec {
            resource_spec: ResourceSpec::default(),
            policy_body: body,
        })
    }

    fn statement(apply_to_iam_user: bool, principal: S3BucketPrincipal) -> S3BucketPolicyStatement {
        S3BucketPolicyStatement {
            statement_id: None,
            effect: "Allow".to_string(),
            principal,
            policy_action: vec!["s3:GetObject".to_string()],
            apply_to_iam_user,
            resource_path: vec!["arn:aws:s3:::bucket/*".to_string()],
        }
    }

    /// Answers each resolution from a script and records the kinds asked for
    #[derive(Default)]
    struct ScriptedResolver {
        responses: Mutex<Vec<ReferenceResult<ResolutionResponse>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedResolver {
        fn new(responses: Vec<ReferenceResult<ResolutionResponse>>) -> Self {
            Self { responses: Mutex::new(responses), requested: Mutex::default() }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Resolve for ScriptedResolver {
        async fn resolve<K>(&self, _token: &CancellationToken, _request: ResolutionRequest<K>) -> ReferenceResult<ResolutionResponse>
        where
            K: ClusterCustomResource,
        {
            self.requested.lock().unwrap().push(K::kind(&()).to_string());
            self.responses.lock().unwrap().remove(0)
        }
    }

    #[tokio::test]
    async fn resolved_values_are_left_unchanged() {
        let reader = MemoryReader::default()
            .with(bucket("media", "acme-media", &[]))
            .with(iam_user("deployer", Some("arn:aws:iam::123:user/other"), &[]));
        let mut resource = policy(BucketPolicyParameters {
            bucket_name: Some("acme-media".to_string()),
            bucket_name_ref: Some(Reference::new("media")),
            user_name_arn: Some(USER_ARN.to_string()),
            user_name_arn_ref: Some(Reference::new("deployer")),
            ..Default::default()
        });
        let before = resource.clone();

        resource.resolve_references(&CancellationToken::new(), &reader).await.unwrap();

        assert_eq!(resource, before);
        assert_eq!(reader.lookups(), 0);
    }

    #[tokio::test]
    async fn bucket_name_is_selected_by_labels() {
        let reader = MemoryReader::default()
            .with(bucket("archive", "acme-archive", &[("app", "archive")]))
            .with(bucket("media", "acme-media", &[("app", "media")]));
        let mut resource = policy(BucketPolicyParameters {
            bucket_name_selector: Some(Selector {
                match_labels: Some([("app".to_string(), "media".to_string())].into()),
                match_controller_ref: None,
            }),
            ..Default::default()
        });

        resource.resolve_references(&CancellationToken::new(), &reader).await.unwrap();

        let body = &resource.spec.policy_body;
        assert_eq!(body.bucket_name.as_deref(), Some("acme-media"));
        assert_eq!(body.bucket_name_ref, Some(Reference::new("media")));
        assert_eq!(body.user_name_arn, None);
        assert_eq!(body.user_name_arn_ref, None);
    }

    #[tokio::test]
    async fn user_without_arn_resolves_empty() {
        let reader = MemoryReader::default().with(iam_user("deployer", None, &[]));
        let mut resource = policy(BucketPolicyParameters {
            user_name_arn_ref: Some(Reference::new("deployer")),
            ..Default::default()
        });

        resource.resolve_references(&CancellationToken::new(), &reader).await.unwrap();

        assert_eq!(resource.spec.policy_body.user_name_arn, None);
        assert_eq!(resource.spec.policy_body.user_name_arn_ref, Some(Reference::new("deployer")));
    }

    #[tokio::test]
    async fn user_arn_is_read_from_referenced_user() {
        let reader = MemoryReader::default()
            .with(bucket("media", "acme-media", &[]))
            .with(iam_user("deployer", Some(USER_ARN), &[]));
        let mut resource = policy(BucketPolicyParameters {
            bucket_name_ref: Some(Reference::new("media")),
            user_name_arn_ref: Some(Reference::new("deployer")),
            ..Default::default()
        });

        resource.resolve_references(&CancellationToken::new(), &reader).await.unwrap();

        assert_eq!(resource.spec.policy_body.bucket_name.as_deref(), Some("acme-media"));
        assert_eq!(resource.spec.policy_body.user_name_arn.as_deref(), Some(USER_ARN));
    }

    #[tokio::test]
    async fn bucket_failure_skips_user_resolution() {
        let resolver = ScriptedResolver::new(vec![
            Err(ReferenceError::GetManagedError(ReaderError::NotFoundError("Bucket".to_string(), "media".to_string()))),
            Ok(ResolutionResponse { resolved_value: USER_ARN.to_string(), resolved_reference: None }),
        ]);
        let mut resource = policy(BucketPolicyParameters {
            bucket_name_ref: Some(Reference::new("media")),
            user_name_arn_ref: Some(Reference::new("deployer")),
            ..Default::default()
        });
        let before = resource.clone();

        let err = resource
            .resolve_references_with(&CancellationToken::new(), &resolver)
            .await
            .unwrap_err();

        assert!(matches!(err, ReferenceError::GetManagedError(ReaderError::NotFoundError(ref kind, ref name)) if kind == "Bucket" && name == "media"));
        assert_eq!(resolver.requested(), vec!["Bucket".to_string()]);
        assert_eq!(resource, before);
    }

    #[tokio::test]
    async fn both_slots_are_overwritten_in_order() {
        let resolver = ScriptedResolver::new(vec![
            Ok(ResolutionResponse { resolved_value: "acme-media".to_string(), resolved_reference: Some(Reference::new("media")) }),
            Ok(ResolutionResponse::default()),
        ]);
        let mut resource = policy(BucketPolicyParameters {
            user_name_arn_ref: Some(Reference::new("stale")),
            ..Default::default()
        });

        resource.resolve_references_with(&CancellationToken::new(), &resolver).await.unwrap();

        assert_eq!(resolver.requested(), vec!["Bucket".to_string(), "IAMUser".to_string()]);
        assert_eq!(resource.spec.policy_body.bucket_name.as_deref(), Some("acme-media"));
        assert_eq!(resource.spec.policy_body.user_name_arn_ref, None);
    }

    #[test]
    fn policy_document_adds_user_arn() {
        let body = BucketPolicyParameters {
            policy_version: "2012-10-17".to_string(),
            policy_statement: vec![
                statement(true, S3BucketPrincipal::default()),
                statement(false, S3BucketPrincipal::anonymous()),
            ],
            user_name_arn: Some(USER_ARN.to_string()),
            ..Default::default()
        };

        let document = serde_json::to_value(body.policy_document().unwrap()).unwrap();

        assert_eq!(document["Statement"][0]["Principal"], json!({"AWS": [USER_ARN]}));
        assert_eq!(document["Statement"][0]["EffectIAMUser"], json!(true));
        assert_eq!(document["Statement"][1]["Principal"], json!("*"));
    }

    #[test]
    fn policy_document_requires_resolved_user() {
        let body = BucketPolicyParameters {
            policy_version: "2012-10-17".to_string(),
            policy_statement: vec![statement(false, S3BucketPrincipal::anonymous()), statement(true, S3BucketPrincipal::default())],
            ..Default::default()
        };

        assert_eq!(body.policy_document(), Err(PolicyError::MissingUserArnError(1)));
    }

    #[test]
    fn spec_wire_names() {
        let resource: BucketPolicy = serde_json::from_value(json!({
            "apiVersion": "s3.aws.crossplane.io/v1alpha1",
            "kind": "BucketPolicy",
            "metadata": {"name": "policy"},
            "spec": {
                "providerConfigRef": {"name": "aws"},
                "forProvider": {
                    "version": "2012-10-17",
                    "statement": [{
                        "Effect": "Allow",
                        "Principal": "*",
                        "Action": ["s3:GetObject"],
                        "Resource": ["arn:aws:s3:::media/*"],
                    }],
                    "bucketNameRef": {"name": "media"},
                    "userNameARNSelector": {"matchControllerRef": true},
                },
            },
        })).unwrap();

        let body = &resource.spec.policy_body;
        assert_eq!(body.bucket_name_ref, Some(Reference::new("media")));
        assert_eq!(body.user_name_arn_selector.as_ref().and_then(|s| s.match_controller_ref), Some(true));
        assert!(body.policy_statement[0].principal.allow_anon);
        assert_eq!(BucketPolicy::kind(&()), "BucketPolicy");
    }
}
