// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use crate::crd::{ClusterCustomResource, common::Managed};
use crate::crd::v1alpha1::bucket_policy::BucketPolicy;
use crate::crd::v1beta1::bucket::Bucket;
use crate::reference::ResolveReferences;

// Trait for the managed resources reconciled by the ManagedController
pub trait ManagedResource: ClusterCustomResource + ResolveReferences + Managed + PartialEq {
    // Problems with the desired state that do not block reconciliation
    fn warnings(&self) -> Vec<String> {
        vec![]
    }
}

impl ManagedResource for Bucket {}

impl ManagedResource for BucketPolicy {
    fn warnings(&self) -> Vec<String> {
        // Reference slots may still be unresolved; the document is only
        // checked once it can be rendered.
        match self.spec.policy_body.policy_document() {
            Ok(document) => document.validate().err().map(|e| e.to_string()).into_iter().collect(),
            Err(_) => vec![],
        }
    }
}
