// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

#[allow(unused_extern_crates)]
extern crate self as s3_operator_controller;

pub mod controller;
pub mod crd;
pub mod error;
pub mod reference;
