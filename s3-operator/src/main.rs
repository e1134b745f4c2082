// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

mod cli;

use std::fmt::Display;
use std::process;
use std::sync::Arc;
use clap::{CommandFactory, Parser};
use futures::StreamExt;
use rustls::crypto::aws_lc_rs;
use tokio::{signal, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use s3_operator_common::config::{AppConfig, AppConfigBuilder};
use s3_operator_common::state::State;
use s3_operator_common::telemetry::{error, info, setup_logging};
use s3_operator_controller::controller::{
    context::Context,
    managed::ManagedController,
    traits::ManagedResource,
    utils::{create_k8s_client, error_policy},
};
use s3_operator_controller::crd::{v1alpha1::bucket_policy::BucketPolicy, v1beta1::bucket::Bucket, utils as crd_utils};

use crate::cli::{CliArgs, Commands};

/// Log the error and exit with a failure status
fn exit_with<E: Display>(e: E) -> ! {
    error!(
        event = "Error",
        error = %e,
    );
    process::exit(1);
}

fn load_config(args: &CliArgs) -> AppConfig {
    let mut builder = AppConfigBuilder::default();
    if let Some(path) = &args.config {
        builder.with_file(path);
    }

    builder
        .with_env()
        .with_override_option("controller.requeue_interval", args.requeue_interval)
        .build()
        .unwrap_or_else(|e| exit_with(e))
}

/// Start a controller for the given managed resource kind on its own task
async fn spawn_controller<T>(ctx: Arc<Context>) -> JoinHandle<()>
where
    T: ManagedResource,
{
    let kind = T::kind(&()).to_string();
    let version = T::version(&()).to_string();
    let controller = ManagedController::create_controller::<T>(ctx.clone()).await;

    info!(event = "ControllerStarted", kind = kind.as_str(), version = version.as_str());
    tokio::spawn(async move {
        controller.run(ManagedController::reconcile::<T>, error_policy::<T>, ctx)
            .for_each(|r| {
                let kind = kind.as_str();
                async move {
                    match r {
                        Ok((object, _)) => info!(event = "Reconciled", kind = kind, name = object.name.as_str()),
                        Err(e) => error!(event = "ReconcileError", kind = kind, error = %e),
                    }
                }
            })
            .await
    })
}

async fn run_controllers(args: &CliArgs) {
    info!(
        event = "Starting",
        version = env!("CARGO_PKG_VERSION"),
    );

    let state = Arc::new(State { config: load_config(args) });
    let client = create_k8s_client().await.unwrap_or_else(|e| exit_with(e));

    // In-flight reference lookups are abandoned once shutdown is requested
    let shutdown = CancellationToken::new();
    let ctx = Arc::new(
        Context::new(client)
            .with_state(state)
            .with_shutdown(shutdown.clone())
    );
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!(event = "ShutdownRequested");
            shutdown.cancel();
        }
    });

    let buckets = spawn_controller::<Bucket>(ctx.clone()).await;
    let bucket_policies = spawn_controller::<BucketPolicy>(ctx).await;

    match tokio::try_join!(buckets, bucket_policies) {
        Ok(_) => info!(event = "Stopped"),
        Err(e) => error!(event = "Error", error = %e),
    }
}

#[tokio::main]
async fn main() {
    // Install the default aws_lc_rs crypto provider
    let _ = aws_lc_rs::default_provider().install_default();

    let args = CliArgs::parse();

    setup_logging();

    match &args.cmd {
        Some(Commands::Crds) => crd_utils::generate_crds().unwrap_or_else(|e| exit_with(e)),
        Some(Commands::Controller) => run_controllers(&args).await,
        None => {
            let _ = CliArgs::command().print_help();
            process::exit(1);
        },
    }
}
