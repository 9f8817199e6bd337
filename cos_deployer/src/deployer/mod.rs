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

pub mod tencent_cos;

use crate::error::DeployError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Delivers a certificate to one target resource.
#[async_trait]
pub trait Deployer: Send {
    /// Identifies the deployer for display, as `"{access name}-{access id}"`.
    fn id(&self) -> String;
    /// Human readable entries of the steps completed so far, in order.
    fn info(&self) -> &[String];
    /// Runs the deployment. Stops at the first failing step; `cancel` is
    /// checked before each remote call is issued.
    async fn deploy(&mut self, cancel: &CancellationToken) -> Result<(), DeployError>;
}
