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

//! Delivers an already-issued TLS certificate to a Tencent Cloud COS bucket
//! domain: the certificate is uploaded to the SSL certificate service, and
//! the returned certificate id is bound to the `region#bucket#domain`
//! instance.

pub mod access;
pub mod config;
pub mod deployer;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod service;
pub mod utils;

pub use access::{AccessRecord, Credential, TencentAccess};
pub use config::{Certificate, CosTarget, DeployConfig, DeployerOption};
pub use deployer::{tencent_cos::CosDeployer, Deployer};
pub use error::DeployError;
pub use tokio_util::sync::CancellationToken;
