// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

//! In-memory doubles for resolving references in tests.

use async_trait::async_trait;
use kube::{Resource, ResourceExt};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::crd::{ClusterCustomResource, common::{EXTERNAL_NAME_ANNOTATION, ResourceSpec}};
use crate::crd::v1alpha1::iam_user::{IAMUser, IAMUserParameters, IAMUserSpec};
use crate::crd::v1beta1::bucket::{Bucket, BucketParameters, BucketSpec};
use crate::reference::{error::{ReaderError, ReaderResult}, reader::ResourceReader};

struct StoredObject {
    kind: String,
    name: String,
    labels: BTreeMap<String, String>,
    value: Value,
}

/// A [`ResourceReader`] over a fixed set of resources
#[derive(Default)]
pub struct MemoryReader {
    objects: Vec<StoredObject>,
    failing: bool,
    stalled: bool,
    lookups: AtomicUsize,
}

impl MemoryReader {
    pub fn with<K>(mut self, resource: K) -> Self
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        self.objects.push(StoredObject {
            kind: K::kind(&()).to_string(),
            name: resource.name_any(),
            labels: resource.labels().clone(),
            value: serde_json::to_value(&resource).expect("resource serializes"),
        });
        self
    }

    /// Make every lookup fail as if the backing store was unavailable
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Make every lookup hang as if the backing store never answered
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    /// Number of lookups performed so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn check_available(&self) -> ReaderResult<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.stalled {
            future::pending::<()>().await;
        }
        if self.failing {
            return Err(ReaderError::KubeError(kube::Error::ReadEvents(
                io::Error::new(io::ErrorKind::ConnectionRefused, "store unavailable"),
            )));
        }
        Ok(())
    }
}

fn decode<K: ClusterCustomResource>(value: &Value) -> ReaderResult<K> {
    serde_json::from_value(value.clone()).map_err(|e| ReaderError::DecodeError(K::kind(&()).to_string(), e))
}

#[async_trait]
impl ResourceReader for MemoryReader {
    async fn get<K>(&self, name: &str) -> ReaderResult<K>
    where
        K: ClusterCustomResource,
    {
        self.check_available().await?;
        let kind = K::kind(&()).to_string();

        self.objects
            .iter()
            .find(|object| object.kind == kind && object.name == name)
            .ok_or_else(|| ReaderError::NotFoundError(kind, name.to_string()))
            .and_then(|object| decode(&object.value))
    }

    async fn list<K>(&self, match_labels: &BTreeMap<String, String>) -> ReaderResult<Vec<K>>
    where
        K: ClusterCustomResource,
    {
        self.check_available().await?;
        let kind = K::kind(&()).to_string();

        self.objects
            .iter()
            .filter(|object| object.kind == kind)
            .filter(|object| match_labels.iter().all(|(key, value)| object.labels.get(key) == Some(value)))
            .map(|object| decode(&object.value))
            .collect()
    }
}

/// A Bucket with the given external name and labels
pub fn bucket(name: &str, external_name: &str, labels: &[(&str, &str)]) -> Bucket {
    let mut bucket = Bucket::new(name, BucketSpec {
        resource_spec: ResourceSpec::default(),
        for_provider: BucketParameters::default(),
    });
    bucket.annotations_mut().insert(EXTERNAL_NAME_ANNOTATION.to_string(), external_name.to_string());
    bucket.labels_mut().extend(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    bucket
}

/// An IAMUser with the given observed ARN and labels
pub fn iam_user(name: &str, arn: Option<&str>, labels: &[(&str, &str)]) -> IAMUser {
    let mut user = IAMUser::new(name, IAMUserSpec {
        resource_spec: ResourceSpec::default(),
        for_provider: IAMUserParameters::default(),
    });
    user.labels_mut().extend(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    user.status = arn.map(|arn| serde_json::from_value(json!({"atProvider": {"arn": arn}})).expect("status deserializes"));
    user
}
