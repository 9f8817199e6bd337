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

use crate::access::AccessRecord;
use crate::error::DeployError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Provider specific settings of a deploy node, keyed by field name.
pub type DeployConfig = BTreeMap<String, Value>;

/// PEM encoded certificate chain and its private key.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub certificate: String,
    pub private_key: String,
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("certificate", &self.certificate)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Everything a deployer is constructed from.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployerOption {
    /// JSON access payload, e.g. `{"secretId": "...", "secretKey": "..."}`.
    pub access: String,
    pub access_record: AccessRecord,
    pub certificate: Certificate,
    pub domain: String,
    #[serde(default)]
    pub deploy_config: DeployConfig,
}

/// The COS bucket domain a certificate is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosTarget {
    pub region: String,
    pub bucket: String,
    pub domain: String,
}

impl CosTarget {
    pub fn from_deploy_config(config: &DeployConfig) -> Result<Self, DeployError> {
        Ok(CosTarget {
            region: required_string(config, "region")?,
            bucket: required_string(config, "bucket")?,
            domain: required_string(config, "domain")?,
        })
    }
    /// The instance id understood by the SSL service for a COS domain.
    pub fn instance_id(&self) -> String {
        format!("{}#{}#{}", self.region, self.bucket, self.domain)
    }
}

fn required_string(config: &DeployConfig, key: &str) -> Result<String, DeployError> {
    match config.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.to_string()),
        Some(Value::String(_)) => Err(DeployError::config(format!(
            "deploy config field {:?} must not be empty",
            key
        ))),
        Some(other) => Err(DeployError::config(format!(
            "deploy config field {:?} must be a string, got {}",
            key, other
        ))),
        None => Err(DeployError::config(format!(
            "deploy config field {:?} is missing",
            key
        ))),
    }
}
