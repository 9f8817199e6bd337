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

//! The certificate management service a deployer talks to.

pub mod signer;
pub mod tencent;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource type of Tencent Cloud Object Storage.
pub const RESOURCE_TYPE_COS: &str = "cos";

/// `Status` value that enables the certificate on the bound instances.
pub const STATUS_ENABLED: i64 = 1;

#[derive(Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct UploadCertificateRequest {
    pub certificate_public_key: String,
    pub certificate_private_key: String,
    pub alias: String,
    /// When false, the service stores a new record even if an identical
    /// certificate was uploaded before.
    pub repeatable: bool,
}

impl fmt::Debug for UploadCertificateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCertificateRequest")
            .field("alias", &self.alias)
            .field("repeatable", &self.repeatable)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct UploadCertificateResponse {
    pub certificate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeployCertificateInstanceRequest {
    pub region: String,
    pub certificate_id: String,
    pub resource_type: String,
    pub status: i64,
    pub instance_id_list: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeployCertificateInstanceResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_record_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl fmt::Display for DeployCertificateInstanceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Uploads certificates and binds them to cloud resources.
#[async_trait]
pub trait CertificateService: Send + Sync {
    async fn upload_certificate(
        &self,
        request: UploadCertificateRequest,
    ) -> Result<UploadCertificateResponse>;
    async fn deploy_certificate_instance(
        &self,
        request: DeployCertificateInstanceRequest,
    ) -> Result<DeployCertificateInstanceResponse>;
}
