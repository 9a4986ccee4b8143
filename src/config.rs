// Copyright 2026 Campus Registry Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "CAMPUS_REGISTRY_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "CAMPUS_REGISTRY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CAMPUS_REGISTRY_LOG_FORMAT";
pub const ENV_SEED_DEMO: &str = "CAMPUS_REGISTRY_SEED_DEMO";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
    /// Seed demo users and events into an empty registry at startup.
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            log_level: env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string()),
            log_format: env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string()),
            seed_demo: env::var(ENV_SEED_DEMO)
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            seed_demo: false,
        }
    }
}
