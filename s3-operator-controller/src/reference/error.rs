// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("kube error: {0}")]
    KubeError(#[from] kube::Error),
    #[error("{0} {1} not found")]
    NotFoundError(String, String),
    #[error("failed to decode {0}: {1}")]
    DecodeError(String, serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("cannot get referenced resource: {0}")]
    GetManagedError(ReaderError),
    #[error("cannot list resources that match selector: {0}")]
    ListManagedError(ReaderError),
    #[error("reference resolution was cancelled")]
    CancelledError,
}

pub type ReaderResult<T> = result::Result<T, ReaderError>;
pub type ReferenceResult<T> = result::Result<T, ReferenceError>;
