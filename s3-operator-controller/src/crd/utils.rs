// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::CustomResourceExt;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;

use crate::crd::v1alpha1::{bucket_policy::BucketPolicy, iam_user::IAMUser};
use crate::crd::v1beta1::bucket::Bucket;


/// The CRDs of every kind served by the operator
pub fn crds() -> Vec<CustomResourceDefinition> {
    vec![
        Bucket::crd(),
        BucketPolicy::crd(),
        IAMUser::crd(),
    ]
}

/// Generate the CRDs for the operator
pub fn generate_crds() -> Result<(), serde_norway::Error> {
    for crd in crds() {
        println!("---");
        println!("{}", serde_norway::to_string(&crd)?);
    }
    Ok(())
}
