// Copyright 2022 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Errors surfaced by a deployer. Each variant names the step that failed;
/// transport and service failures are carried as the wrapped cause.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid deployer config: {0}")]
    Config(String),
    #[error("failed to upload certificate: {0:#}")]
    Upload(anyhow::Error),
    #[error("failed to deploy: {0:#}")]
    Bind(anyhow::Error),
    #[error("deployment cancelled before {0}")]
    Cancelled(&'static str),
}

impl DeployError {
    pub fn config(message: impl ToString) -> Self {
        DeployError::Config(message.to_string())
    }
}
