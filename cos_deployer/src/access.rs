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

//! Access profiles and the credential derived from them.

use crate::error::DeployError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The stored access payload of a Tencent Cloud account.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TencentAccess {
    pub secret_id: String,
    pub secret_key: String,
}

impl TencentAccess {
    /// Parses the access payload, which must be a JSON object.
    pub fn from_json(access: &str) -> Result<Self, DeployError> {
        let parse_error =
            |e: serde_json::Error| DeployError::config(format!("failed to parse tencent access: {}", e));
        let object: Map<String, Value> = serde_json::from_str(access).map_err(parse_error)?;
        serde_json::from_value(Value::Object(object)).map_err(parse_error)
    }
}

impl fmt::Debug for TencentAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TencentAccess")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// The record under which an access payload is stored. Only used to
/// identify a deployer for display.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AccessRecord {
    pub id: String,
    pub name: String,
}

/// Signing material for Tencent Cloud API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret_id: String,
    secret_key: String,
}

impl Credential {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Credential {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
        }
    }
    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl From<TencentAccess> for Credential {
    fn from(access: TencentAccess) -> Self {
        Credential::new(access.secret_id, access.secret_key)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .finish_non_exhaustive()
    }
}
