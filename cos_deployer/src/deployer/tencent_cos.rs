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

//! Deploys a certificate to a custom domain of a Tencent Cloud COS bucket.

use super::Deployer;
use crate::access::{Credential, TencentAccess};
use crate::config::{CosTarget, DeployerOption};
use crate::error::DeployError;
use crate::fetcher::Fetcher;
use crate::service::tencent::SslClient;
use crate::service::{
    CertificateService, DeployCertificateInstanceRequest, UploadCertificateRequest,
    RESOURCE_TYPE_COS, STATUS_ENABLED,
};
use crate::utils::random_string;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const ALIAS_SUFFIX_LEN: usize = 6;

pub struct CosDeployer<S: CertificateService> {
    option: DeployerOption,
    target: CosTarget,
    service: S,
    infos: Vec<String>,
    alias_suffix: fn(usize) -> String,
}

impl<F: Fetcher> CosDeployer<SslClient<F>> {
    /// Creates a deployer that calls the public Tencent Cloud SSL API through
    /// `fetcher`.
    pub fn new(option: DeployerOption, fetcher: F) -> Result<Self, DeployError> {
        Self::with_service(option, |credential| SslClient::new(credential, fetcher))
    }
}

impl<S: CertificateService> CosDeployer<S> {
    /// Parses the access payload and target of `option`, and hands the
    /// resulting credential to `make_service`. No remote call is made.
    pub fn with_service(
        option: DeployerOption,
        make_service: impl FnOnce(Credential) -> S,
    ) -> Result<Self, DeployError> {
        Self::try_with_service(option, |credential| Ok(make_service(credential)))
    }
    /// Like [`CosDeployer::with_service`], for services whose setup can fail.
    /// A setup failure is reported as a config error.
    pub fn try_with_service(
        option: DeployerOption,
        make_service: impl FnOnce(Credential) -> anyhow::Result<S>,
    ) -> Result<Self, DeployError> {
        let access = TencentAccess::from_json(&option.access)?;
        let target = CosTarget::from_deploy_config(&option.deploy_config)?;
        let service = make_service(Credential::from(access))
            .map_err(|e| DeployError::config(format!("{:#}", e)))?;
        Ok(CosDeployer {
            option,
            target,
            service,
            infos: Vec::new(),
            alias_suffix: random_string,
        })
    }
    /// Replaces the generator of the alias suffix.
    pub fn with_alias_suffix(mut self, alias_suffix: fn(usize) -> String) -> Self {
        self.alias_suffix = alias_suffix;
        self
    }
    pub fn target(&self) -> &CosTarget {
        &self.target
    }
    pub fn service(&self) -> &S {
        &self.service
    }
    async fn upload_certificate(&self) -> anyhow::Result<String> {
        let alias = format!(
            "{}_{}",
            self.option.domain,
            (self.alias_suffix)(ALIAS_SUFFIX_LEN)
        );
        let request = UploadCertificateRequest {
            certificate_public_key: self.option.certificate.certificate.clone(),
            certificate_private_key: self.option.certificate.private_key.clone(),
            alias,
            repeatable: false,
        };
        let response = self.service.upload_certificate(request).await?;
        Ok(response.certificate_id)
    }
    async fn deploy_certificate_instance(&self, certificate_id: &str) -> anyhow::Result<String> {
        let request = DeployCertificateInstanceRequest {
            region: self.target.region.clone(),
            certificate_id: certificate_id.to_string(),
            resource_type: RESOURCE_TYPE_COS.to_string(),
            status: STATUS_ENABLED,
            instance_id_list: vec![self.target.instance_id()],
        };
        let response = self.service.deploy_certificate_instance(request).await?;
        Ok(response.to_string())
    }
}

#[async_trait]
impl<S: CertificateService> Deployer for CosDeployer<S> {
    fn id(&self) -> String {
        format!(
            "{}-{}",
            self.option.access_record.name, self.option.access_record.id
        )
    }
    fn info(&self) -> &[String] {
        &self.infos
    }
    async fn deploy(&mut self, cancel: &CancellationToken) -> Result<(), DeployError> {
        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled("upload"));
        }
        let certificate_id = self.upload_certificate().await.map_err(|e| {
            warn!(deployer = %self.id(), error = %format!("{:#}", e), "certificate upload failed");
            DeployError::Upload(e)
        })?;
        info!(deployer = %self.id(), %certificate_id, "certificate uploaded");
        self.infos.push(format!("upload certificate: {}", certificate_id));

        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled("deploy"));
        }
        let response = self
            .deploy_certificate_instance(&certificate_id)
            .await
            .map_err(|e| {
                warn!(
                    deployer = %self.id(),
                    instance = %self.target.instance_id(),
                    error = %format!("{:#}", e),
                    "certificate binding failed"
                );
                DeployError::Bind(e)
            })?;
        info!(deployer = %self.id(), instance = %self.target.instance_id(), "certificate deployed");
        self.infos.push(format!("deploy certificate: {}", response));
        Ok(())
    }
}
