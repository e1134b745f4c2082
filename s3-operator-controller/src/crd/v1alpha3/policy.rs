// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;

/// Literal principal granting access to everyone
pub static ANONYMOUS_PRINCIPAL: &str = "*";

#[derive(Error, Debug, PartialEq)]
pub enum PolicyError {
    #[error("policy has no statements")]
    EmptyPolicyError,
    #[error("statement {0}: effect `{1}` is not one of Allow, Deny")]
    InvalidEffectError(usize, String),
    #[error("statement {0}: no actions")]
    EmptyActionError(usize),
    #[error("statement {0}: principal allows anonymous access and lists explicit principals, which are ignored")]
    ConflictingPrincipalError(usize),
    #[error("statement {0}: applies to the IAM user but no user ARN is resolved")]
    MissingUserArnError(usize),
}

/// S3BucketPolicy defines the policy for the S3 Bucket being created.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct S3BucketPolicy {
    #[serde(rename = "Version")]
    /// The current IAM policy version
    pub policy_version: String,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    /// The policy's optional identifier
    pub policy_id: Option<String>,
    #[serde(rename = "Statement")]
    pub policy_statement: Vec<S3BucketPolicyStatement>,
}

impl S3BucketPolicy {
    /// Check the document for mistakes the provider would reject or silently
    /// reinterpret. Serialization is unaffected by the outcome.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.policy_statement.is_empty() {
            return Err(PolicyError::EmptyPolicyError);
        }

        for (index, statement) in self.policy_statement.iter().enumerate() {
            if statement.effect != "Allow" && statement.effect != "Deny" {
                return Err(PolicyError::InvalidEffectError(index, statement.effect.clone()));
            }
            if statement.policy_action.is_empty() {
                return Err(PolicyError::EmptyActionError(index));
            }
            if statement.principal.is_conflicting() {
                return Err(PolicyError::ConflictingPrincipalError(index));
            }
        }

        Ok(())
    }
}

/// S3BucketPolicyStatement defines an individual statement within the
/// S3BucketPolicy
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct S3BucketPolicyStatement {
    #[serde(rename = "Sid", default, skip_serializing_if = "Option::is_none")]
    /// Optional identifier for this statement, must be unique within the
    /// policy if provided.
    pub statement_id: Option<String>,
    #[serde(rename = "Effect")]
    /// Whether the statement allows or explicitly denies access. Valid values
    /// are Allow and Deny.
    pub effect: String,
    #[serde(rename = "Principal", default)]
    #[schemars(schema_with = "principal_schema")]
    /// The principal that is allowed or denied access to a resource
    pub principal: S3BucketPrincipal,
    #[serde(rename = "Action")]
    /// The actions allowed or denied by this statement
    pub policy_action: Vec<String>,
    #[serde(rename = "EffectIAMUser", default, skip_serializing_if = "is_false")]
    /// Apply this statement to the IAM user that was either passed in or
    /// created for this bucket
    pub apply_to_iam_user: bool,
    #[serde(rename = "Resource", default)]
    /// The paths on which this statement applies
    pub resource_path: Vec<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn principal_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
    schemars::json_schema!({
        "description": "Either \"*\" for anonymous access or an object with an AWS list of principal ARNs",
        "x-kubernetes-preserve-unknown-fields": true,
    })
}

/// S3BucketPrincipal defines the principal users affected by the
/// S3BucketPolicyStatement.
///
/// Anonymous access takes precedence: a principal with `allow_anon` set is
/// written as `"*"` and any explicit principals are dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct S3BucketPrincipal {
    /// Make the policy available to all anonymous users
    pub allow_anon: bool,
    /// The AWS IAM users affected by the policy statement
    pub aws_principal: Vec<String>,
}

impl S3BucketPrincipal {
    pub fn anonymous() -> Self {
        S3BucketPrincipal { allow_anon: true, aws_principal: vec![] }
    }

    /// Both anonymous access and explicit principals are set
    pub fn is_conflicting(&self) -> bool {
        self.allow_anon && !self.aws_principal.is_empty()
    }
}

impl Serialize for S3BucketPrincipal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.allow_anon {
            return serializer.serialize_str(ANONYMOUS_PRINCIPAL);
        }

        let len = usize::from(!self.aws_principal.is_empty());
        let mut map = serializer.serialize_map(Some(len))?;
        if !self.aws_principal.is_empty() {
            map.serialize_entry("AWS", &self.aws_principal)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrincipalRepr {
    Wildcard(String),
    Explicit {
        #[serde(rename = "AnonymousAccess", default)]
        allow_anon: bool,
        #[serde(rename = "AWS", default)]
        aws_principal: Option<OneOrMany>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for S3BucketPrincipal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PrincipalRepr::deserialize(deserializer)? {
            PrincipalRepr::Wildcard(value) if value == ANONYMOUS_PRINCIPAL => Ok(S3BucketPrincipal::anonymous()),
            PrincipalRepr::Wildcard(value) => Err(de::Error::custom(format!(
                "invalid principal `{}`, expected \"*\" or an object",
                value
            ))),
            PrincipalRepr::Explicit { allow_anon, aws_principal } => Ok(S3BucketPrincipal {
                allow_anon,
                aws_principal: match aws_principal {
                    Some(OneOrMany::One(principal)) => vec![principal],
                    Some(OneOrMany::Many(principals)) => principals,
                    None => vec![],
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{json, Value};

    const USER_ARN: &str = "arn:aws:iam::123:user/x";

    fn aws(arns: &[&str]) -> S3BucketPrincipal {
        S3BucketPrincipal {
            allow_anon: false,
            aws_principal: arns.iter().map(|arn| arn.to_string()).collect(),
        }
    }

    fn statement(effect: &str, principal: S3BucketPrincipal) -> S3BucketPolicyStatement {
        S3BucketPolicyStatement {
            statement_id: Some("s1".to_string()),
            effect: effect.to_string(),
            principal,
            policy_action: vec!["s3:GetObject".to_string()],
            apply_to_iam_user: false,
            resource_path: vec!["arn:aws:s3:::bucket/*".to_string()],
        }
    }

    #[test]
    fn anonymous_principal_drops_explicit_principals() {
        // Anonymous access wins even when explicit principals are listed.
        let principal = S3BucketPrincipal {
            allow_anon: true,
            aws_principal: vec![USER_ARN.to_string()],
        };

        assert_eq!(serde_json::to_string(&principal).unwrap(), r#""*""#);
    }

    #[test]
    fn explicit_principal_serializes_as_aws_object() {
        let principal = aws(&[USER_ARN]);

        assert_eq!(
            serde_json::to_string(&principal).unwrap(),
            r#"{"AWS":["arn:aws:iam::123:user/x"]}"#
        );
    }

    #[test]
    fn empty_principal_serializes_as_empty_object() {
        assert_eq!(serde_json::to_string(&S3BucketPrincipal::default()).unwrap(), "{}");
    }

    #[rstest]
    #[case(json!("*"), S3BucketPrincipal::anonymous())]
    #[case(json!({"AWS": [USER_ARN]}), aws(&[USER_ARN]))]
    #[case(json!({"AWS": USER_ARN}), aws(&[USER_ARN]))]
    #[case(json!({"AnonymousAccess": true}), S3BucketPrincipal::anonymous())]
    #[case(json!({}), S3BucketPrincipal::default())]
    fn principal_deserializes(#[case] input: Value, #[case] expected: S3BucketPrincipal) {
        let principal: S3BucketPrincipal = serde_json::from_value(input).unwrap();
        assert_eq!(principal, expected);
    }

    #[test]
    fn principal_rejects_other_strings() {
        assert!(serde_json::from_value::<S3BucketPrincipal>(json!("someone")).is_err());
    }

    #[test]
    fn policy_document_round_trips() {
        let document = r#"{"Version":"2012-10-17","Statement":[{"Sid":"s1","Effect":"Allow","Principal":{"AWS":["arn:aws:iam::123:user/x"]},"Action":["s3:GetObject"],"Resource":["arn:aws:s3:::bucket/*"]}]}"#;

        let policy: S3BucketPolicy = serde_json::from_str(document).unwrap();

        assert_eq!(policy.policy_version, "2012-10-17");
        assert_eq!(policy.policy_id, None);
        assert_eq!(policy.policy_statement, vec![statement("Allow", aws(&[USER_ARN]))]);

        let reserialized: Value = serde_json::from_str(&serde_json::to_string(&policy).unwrap()).unwrap();
        let original: Value = serde_json::from_str(document).unwrap();
        assert_eq!(reserialized, original);
    }

    #[test]
    fn iam_user_flag_is_written_only_when_set() {
        let mut flagged = statement("Deny", S3BucketPrincipal::anonymous());
        flagged.apply_to_iam_user = true;

        let value = serde_json::to_value(&flagged).unwrap();
        assert_eq!(value["EffectIAMUser"], json!(true));
        assert_eq!(value["Principal"], json!("*"));

        let value = serde_json::to_value(statement("Deny", S3BucketPrincipal::anonymous())).unwrap();
        assert!(value.get("EffectIAMUser").is_none());
    }

    #[rstest]
    #[case(vec![], Err(PolicyError::EmptyPolicyError))]
    #[case(vec![statement("Allow", aws(&[USER_ARN]))], Ok(()))]
    #[case(vec![statement("Permit", S3BucketPrincipal::anonymous())], Err(PolicyError::InvalidEffectError(0, "Permit".to_string())))]
    #[case(
        vec![
            statement("Deny", S3BucketPrincipal::anonymous()),
            statement("Allow", S3BucketPrincipal { allow_anon: true, aws_principal: vec![USER_ARN.to_string()] }),
        ],
        Err(PolicyError::ConflictingPrincipalError(1))
    )]
    fn validate_policy(#[case] statements: Vec<S3BucketPolicyStatement>, #[case] expected: Result<(), PolicyError>) {
        let policy = S3BucketPolicy {
            policy_version: "2012-10-17".to_string(),
            policy_id: None,
            policy_statement: statements,
        };

        assert_eq!(policy.validate(), expected);
    }

    #[test]
    fn validate_rejects_statement_without_actions() {
        let mut empty = statement("Allow", S3BucketPrincipal::anonymous());
        empty.policy_action.clear();
        let policy = S3BucketPolicy {
            policy_version: "2012-10-17".to_string(),
            policy_id: Some("policy".to_string()),
            policy_statement: vec![empty],
        };

        assert_eq!(policy.validate(), Err(PolicyError::EmptyActionError(0)));
    }
}
