// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::path::Path;
use std::time::Duration;
use serde::{Serialize, Deserialize};
use figment::{Figment, Error, providers::{Format, Json, Toml, Yaml, Env, Serialized}};

use crate::constant::ENV_PREFIX;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
}


#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ControllerConfig {
    /// Seconds between reconciliations of a healthy resource
    #[serde(default = "default_requeue_interval")]
    pub requeue_interval: u64,
    /// Seconds before retrying a resource whose reconciliation failed
    #[serde(default = "default_error_requeue_interval")]
    pub error_requeue_interval: u64,
}

impl ControllerConfig {
    pub fn requeue_after(&self) -> Duration {
        Duration::from_secs(self.requeue_interval)
    }

    pub fn error_requeue_after(&self) -> Duration {
        Duration::from_secs(self.error_requeue_interval)
    }
}

fn default_requeue_interval() -> u64 {
    60
}

fn default_error_requeue_interval() -> u64 {
    30
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            requeue_interval: default_requeue_interval(),
            error_requeue_interval: default_error_requeue_interval(),
        }
    }
}

pub struct AppConfigBuilder {
    figment: Figment,
}

impl AppConfigBuilder {
    pub fn with_file(&mut self, path: &str) -> &mut Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        self.figment = match extension {
            "json" => self.figment.clone().merge(Json::file(path)),
            "yaml" | "yml" => self.figment.clone().merge(Yaml::file(path)),
            "toml" => self.figment.clone().merge(Toml::file(path)),
            _ => self.figment.clone(),
        };
        self
    }

    pub fn with_env(&mut self) -> &mut Self {
        self.figment = self.figment.clone().merge(Env::prefixed(&format!("{}__", ENV_PREFIX)).split("__"));
        self
    }

    pub fn with_override_option<T: Serialize>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.figment = self.figment.clone().merge(Serialized::default(key, value));
        }
        self
    }

    pub fn build(&self) -> Result<AppConfig, Error> {
        self.figment.extract()
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        AppConfigBuilder {
            figment: Figment::from(Serialized::defaults(AppConfig::default()))
        }
    }
}
