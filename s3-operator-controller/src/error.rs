// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::result;
use thiserror::Error;

use crate::reference::error::ReferenceError;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("kube error: {0}")]
    KubeError(#[from] kube::Error),
    #[error("cannot resolve references: {0}")]
    ReferenceError(#[from] ReferenceError),
}

pub type Result<T> = result::Result<T, ControllerError>;
