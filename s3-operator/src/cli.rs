// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[
    clap(
        name = "s3-operator",
        version,
        author,
        about = "Operator for managing S3 buckets and bucket policies"
    )
]
pub struct CliArgs {
    #[clap(long, short, env = "S3_OPERATOR_CONFIG", global = true, help = "Path to a JSON, YAML or TOML configuration file")]
    pub config: Option<String>,
    #[clap(long, env = "S3_OPERATOR_REQUEUE_INTERVAL", global = true, help = "Seconds between reconciliations of a healthy resource")]
    pub requeue_interval: Option<u64>,
    #[clap(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[
        clap(
            name = "crds",
            about = "Generate Custom Resource Definitions (CRDs) for the operator"
        )
    ]
    Crds,
    #[
        clap(
            name = "controller",
            about = "Run the controllers"
        )
    ]
    Controller,
}
