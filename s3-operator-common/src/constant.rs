// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

pub static ENV_PREFIX: &str = "S3_OPERATOR";
