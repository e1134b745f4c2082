// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use async_trait::async_trait;
use kube::{core::object::ObjectList, CustomResource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;

use crate::crd::common::{Managed, Reference, ResourceSpec, ResourceStatus, Selector};
use crate::reference::{
    external_name, to_value, Resolve, ResolveReferences, ResolutionRequest,
    error::ReferenceResult,
};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    kind = "Bucket",
    group = "s3.aws.crossplane.io",
    version = "v1beta1",
    status = "BucketStatus",
    doc = "A Bucket is a managed resource that represents an AWS S3 Bucket.",
    derive = "PartialEq",
    category = "crossplane",
    category = "managed",
    category = "aws",
    printcolumn = r#"{"name":"READY", "type":"string", "jsonPath":".status.conditions[?(@.type=='Ready')].status"}"#,
    printcolumn = r#"{"name":"SYNCED", "type":"string", "jsonPath":".status.conditions[?(@.type=='Synced')].status"}"#,
    printcolumn = r#"{"name":"AGE", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct BucketSpec {
    #[serde(flatten)]
    pub resource_spec: ResourceSpec,
    /// Parameters for configuring the calls made to the AWS Bucket API
    pub for_provider: BucketParameters,
}

pub type BucketList = ObjectList<Bucket>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct BucketStatus {
    #[serde(flatten)]
    pub resource_status: ResourceStatus,
}

impl Managed for Bucket {
    fn resource_status(&self) -> Option<&ResourceStatus> {
        self.status.as_ref().map(|status| &status.resource_status)
    }
}

/// BucketParameters are parameters for configuring the calls made to AWS Bucket API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BucketParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The canned ACL to apply to the bucket.
    pub acl: Option<CannedAcl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The Region where the bucket will be created, us-east-1 when unset.
    pub location_constraint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Allows grantee the read, write, read ACP, and write ACP permissions on the bucket.
    pub grant_full_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Allows grantee to list the objects in the bucket.
    pub grant_read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "grantReadAcp")]
    /// Allows grantee to read the bucket ACL.
    pub grant_read_acp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Allows grantee to create, overwrite, and delete any object in the bucket.
    pub grant_write: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "grantWriteAcp")]
    /// Allows grantee to write the ACL for the applicable bucket.
    pub grant_write_acp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether S3 Object Lock is enabled for the new bucket.
    pub object_lock_enabled_for_bucket: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Default encryption for the bucket, with either S3-managed keys (SSE-S3)
    /// or customer master keys stored in AWS KMS (SSE-KMS).
    pub server_side_encryption_configuration: Option<ServerSideEncryptionConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The versioning state of the bucket.
    pub versioning_configuration: Option<VersioningConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The transfer acceleration state of the bucket.
    pub accelerate_configuration: Option<AccelerateConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "corsConfiguration")]
    /// The cross-origin access configuration for objects in the bucket.
    pub cors_configuration: Option<CorsConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Website configuration parameters for the bucket.
    pub website_configuration: Option<WebsiteConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Logging parameters for the bucket.
    pub logging_configuration: Option<LoggingConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "paymentConfiguration")]
    /// Request payment parameters for the bucket.
    pub payer_configuration: Option<PaymentConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "tagging")]
    /// Tags used to organize the AWS bill of the bucket.
    pub bucket_tagging: Option<Tagging>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Replication configuration of the bucket, replacing any existing one.
    pub replication_configuration: Option<ReplicationConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Lifecycle configuration of the bucket, replacing any existing one.
    pub lifecycle_configuration: Option<BucketLifecycleConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Notifications of specified events for the bucket.
    pub notification_configuration: Option<NotificationConfiguration>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum ToggleStatus {
    Enabled,
    Disabled,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum SuspendableStatus {
    Enabled,
    Suspended,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryptionConfiguration {
    /// Rules that define the default encryption of the bucket
    pub rules: Vec<ServerSideEncryptionRule>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryptionRule {
    /// Default encryption applied to new objects put in the bucket without
    /// an encryption setting of their own
    pub apply_server_side_encryption_by_default: ServerSideEncryptionByDefault,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerSideEncryptionByDefault {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "kmsMasterKeyId")]
    /// KMS master key ID, only used with the aws:kms algorithm
    pub kms_master_key_id: Option<String>,
    /// Server-side encryption algorithm used for the default encryption
    pub sse_algorithm: SseAlgorithm,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum SseAlgorithm {
    #[serde(rename = "AES256")]
    Aes256,
    #[serde(rename = "aws:kms")]
    AwsKms,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersioningConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "mfaDelete")]
    /// Whether MFA delete is enabled, only returned if ever configured
    pub mfa_delete: Option<ToggleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The versioning state of the bucket
    pub status: Option<SuspendableStatus>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct AccelerateConfiguration {
    /// The transfer acceleration state of the bucket
    pub status: SuspendableStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfiguration {
    #[serde(rename = "corsRules")]
    /// The CORS rules of the bucket, at most 100
    pub cors_rules: Vec<CorsRule>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorsRule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Headers allowed in a preflight request
    pub allowed_headers: Vec<String>,
    /// HTTP methods the origin is allowed to execute
    pub allowed_methods: Vec<String>,
    /// Origins allowed to access the bucket
    pub allowed_origins: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Response headers customers are able to access from their applications
    pub expose_headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Seconds the browser caches the preflight response
    pub max_age_seconds: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_document: Option<ErrorDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_document: Option<IndexDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Redirect all requests to another host; no other field may be set
    pub redirect_all_requests_to: Option<RedirectAllRequestsTo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routing_rules: Vec<RoutingRule>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ErrorDocument {
    /// Object key returned when a 4XX error occurs
    pub key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct IndexDocument {
    /// Suffix appended to requests for a directory on the website endpoint
    pub suffix: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedirectAllRequestsTo {
    pub host_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct RoutingRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// When the redirect applies
    pub condition: Option<RoutingRuleCondition>,
    /// Where the request is redirected
    pub redirect: Redirect,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRuleCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error_code_returned_equals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix_equals: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_redirect_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_key_prefix_with: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_key_with: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The bucket that receives the logs, which may be this bucket
    pub target_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Reference to the Bucket receiving the logs
    pub target_bucket_ref: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Selects the Bucket receiving the logs
    pub target_bucket_selector: Option<Selector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_grants: Vec<TargetGrant>,
    /// Prefix for all log object keys
    pub target_prefix: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct TargetGrant {
    pub grantee: TargetGrantee,
    /// Logging permission assigned to the grantee
    pub permission: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TargetGrantee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iD")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "URI")]
    pub uri: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, JsonSchema)]
pub enum Payer {
    BucketOwner,
    Requester,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct PaymentConfiguration {
    /// Who pays for downloads and requests against the bucket
    pub payer: Payer,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tagging {
    pub tag_set: Vec<Tag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// ARN of the IAM role assumed by S3 when replicating objects
    pub role: Option<String>,
    /// Replication rules, at least one and at most 1,000
    pub rules: Vec<ReplicationRule>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_marker_replication: Option<DeleteMarkerReplication>,
    /// Where replicated objects are stored
    pub destination: Destination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Which objects the rule applies to
    pub filter: Option<ReplicationRuleFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iD")]
    /// Unique identifier of the rule, at most 255 characters
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Which rule wins when several rules target the same destination
    pub priority: Option<i32>,
    /// Whether the rule is enabled
    pub status: ToggleStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct DeleteMarkerReplication {
    pub status: ToggleStatus,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Account ID of the destination bucket owner
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// The destination bucket
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Reference to the destination Bucket
    pub bucket_ref: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Selects the destination Bucket
    pub bucket_selector: Option<Selector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Owner override applied to replicas in a cross-account setup
    pub access_control_translation: Option<AccessControlTranslation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_configuration: Option<EncryptionConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Storage class of the replicas, defaults to the class of the source
    pub storage_class: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct AccessControlTranslation {
    pub owner: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionConfiguration {
    #[serde(rename = "replicaKmsKeyID")]
    pub replica_kms_key_id: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct ReplicationRuleFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Combines a prefix and tags, all of which must match
    pub and: Option<ReplicationRuleAndOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct ReplicationRuleAndOperator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<Tag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct BucketLifecycleConfiguration {
    /// Lifecycle rules for objects in the bucket
    pub rules: Vec<LifecycleRule>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort_incomplete_multipart_upload: Option<AbortIncompleteMultipartUpload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// When objects expire
    pub expiration: Option<LifecycleExpiration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Which objects the rule applies to
    pub filter: Option<LifecycleRuleFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iD")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration: Option<NoncurrentVersionExpiration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub noncurrent_version_transitions: Vec<NoncurrentVersionTransition>,
    /// Whether the rule is applied
    pub status: ToggleStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// When objects move to another storage class
    pub transitions: Vec<Transition>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbortIncompleteMultipartUpload {
    /// Days after initiation before an incomplete multipart upload is aborted
    pub days_after_initiation: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleExpiration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Date the objects are moved or deleted, in ISO 8601 format
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Lifetime of the objects in days, a non-zero positive integer
    pub days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Remove expired object delete markers in a versioned bucket
    pub expired_object_delete_marker: Option<bool>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct LifecycleRuleFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<LifecycleRuleAndOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct LifecycleRuleAndOperator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoncurrentVersionExpiration {
    /// Days an object is noncurrent before it is deleted
    pub noncurrent_days: i64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoncurrentVersionTransition {
    pub noncurrent_days: i64,
    pub storage_class: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    pub storage_class: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfiguration {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lambda_function_configurations: Vec<LambdaFunctionConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queue_configurations: Vec<QueueConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topic_configurations: Vec<TopicConfiguration>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LambdaFunctionConfiguration {
    /// Bucket events that invoke the function
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationConfigurationFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iD")]
    pub id: Option<String>,
    #[serde(rename = "lambdaFunctionArn")]
    pub lambda_function_arn: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueConfiguration {
    /// Bucket events that publish to the queue
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationConfigurationFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iD")]
    pub id: Option<String>,
    #[serde(rename = "queueArn")]
    pub queue_arn: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopicConfiguration {
    /// Bucket events that publish to the topic
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<NotificationConfigurationFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "iD")]
    pub id: Option<String>,
    #[serde(rename = "topicArn")]
    pub topic_arn: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct NotificationConfigurationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<S3KeyFilter>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct S3KeyFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_rules: Vec<FilterRule>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct FilterRule {
    /// Either `prefix` or `suffix`
    pub name: String,
    pub value: String,
}

#[async_trait]
impl ResolveReferences for Bucket {
    async fn resolve_references_with<S>(&mut self, token: &CancellationToken, resolver: &S) -> ReferenceResult<()>
    where
        S: Resolve,
    {
        let parameters = &mut self.spec.for_provider;

        if let Some(logging) = parameters.logging_configuration.as_mut() {
            let rsp = resolver.resolve(token, ResolutionRequest::<Bucket> {
                current_value: to_value(&logging.target_bucket),
                reference: logging.target_bucket_ref.clone(),
                selector: logging.target_bucket_selector.clone(),
                extract: external_name(),
            }).await?;
            logging.target_bucket = rsp.value();
            logging.target_bucket_ref = rsp.resolved_reference;
        }

        if let Some(replication) = parameters.replication_configuration.as_mut() {
            for rule in replication.rules.iter_mut() {
                let destination = &mut rule.destination;
                let rsp = resolver.resolve(token, ResolutionRequest::<Bucket> {
                    current_value: to_value(&destination.bucket),
                    reference: destination.bucket_ref.clone(),
                    selector: destination.bucket_selector.clone(),
                    extract: external_name(),
                }).await?;
                destination.bucket = rsp.value();
                destination.bucket_ref = rsp.resolved_reference;
            }
        }

        Ok(())
    }

    fn resolved_spec(&self) -> Value {
        let parameters = &self.spec.for_provider;
        let mut for_provider = Map::new();

        if let Some(logging) = &parameters.logging_configuration {
            for_provider.insert("loggingConfiguration".to_string(), json!({
                "targetBucket": logging.target_bucket,
                "targetBucketRef": logging.target_bucket_ref,
            }));
        }
        // Merge patches replace lists whole, so every rule is carried.
        if let Some(replication) = &parameters.replication_configuration {
            for_provider.insert("replicationConfiguration".to_string(), json!({
                "rules": replication.rules,
            }));
        }

        json!({ "forProvider": for_provider })
    }
}
