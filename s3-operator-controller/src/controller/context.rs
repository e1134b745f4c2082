// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use s3_operator_common::config::ControllerConfig;
use s3_operator_common::state::State;

// Context struct to hold the kube client, the state and the shutdown signal
#[derive(Clone)]
pub struct Context {
    pub client: Client,
    pub state: Option<Arc<State>>,
    pub shutdown: CancellationToken,
}

impl Context {
    pub fn new(client: Client) -> Self {
        Self { client, state: None, shutdown: CancellationToken::new() }
    }

    pub fn with_state(mut self, state: Arc<State>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The controller configuration, or the defaults when no state is attached
    pub fn controller_config(&self) -> ControllerConfig {
        self.state
            .as_ref()
            .map(|state| state.config.controller.clone())
            .unwrap_or_default()
    }
}
