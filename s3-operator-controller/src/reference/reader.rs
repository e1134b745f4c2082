// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use async_trait::async_trait;
use kube::{api::{Api, ListParams}, Client};
use std::collections::BTreeMap;

use crate::crd::ClusterCustomResource;
use crate::reference::error::{ReaderError, ReaderResult};

/// Read-only access to the declared resources a reference may point at
#[async_trait]
pub trait ResourceReader: Send + Sync {
    /// Get the resource of kind `K` with the given name
    async fn get<K>(&self, name: &str) -> ReaderResult<K>
    where
        K: ClusterCustomResource;

    /// List the resources of kind `K` carrying all of the given labels
    async fn list<K>(&self, match_labels: &BTreeMap<String, String>) -> ReaderResult<Vec<K>>
    where
        K: ClusterCustomResource;
}

/// Reads resources from the cluster through the kube API
#[derive(Clone)]
pub struct KubeReader {
    client: Client,
}

impl KubeReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceReader for KubeReader {
    async fn get<K>(&self, name: &str) -> ReaderResult<K>
    where
        K: ClusterCustomResource,
    {
        Api::<K>::all(self.client.clone())
            .get_opt(name)
            .await?
            .ok_or_else(|| ReaderError::NotFoundError(K::kind(&()).to_string(), name.to_string()))
    }

    async fn list<K>(&self, match_labels: &BTreeMap<String, String>) -> ReaderResult<Vec<K>>
    where
        K: ClusterCustomResource,
    {
        let params = ListParams::default().labels(&label_query(match_labels));

        Ok(Api::<K>::all(self.client.clone()).list(&params).await?.items)
    }
}

/// Convert match labels to a label selector query string
pub fn label_query(match_labels: &BTreeMap<String, String>) -> String {
    match_labels
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}
