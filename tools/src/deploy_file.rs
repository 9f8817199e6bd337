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

//! The YAML file describing one COS deployment.
//!
//! ```yaml
//! access:
//!   secretId: AKID...
//!   secretKey: ...
//! access_record:
//!   id: rec1
//!   name: prod
//! domain: example.com
//! certificate_file: fullchain.pem
//! private_key_file: privkey.pem
//! deploy_config:
//!   region: ap-guangzhou
//!   bucket: assets-1250000000
//!   domain: static.example.com
//! ```

use anyhow::{anyhow, Context, Error, Result};
use cos_deployer::{AccessRecord, Certificate, DeployConfig, DeployerOption, TencentAccess};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DeployFile {
    pub access: TencentAccess,
    /// Names the deployer in logs, as `"{name}-{id}"`.
    pub access_record: AccessRecord,
    pub domain: String,
    /// Relative paths are resolved against the directory of the deploy file.
    pub certificate_file: PathBuf,
    pub private_key_file: PathBuf,
    pub deploy_config: DeployConfig,
    /// Overrides the Tencent Cloud SSL API endpoint.
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl DeployFile {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deploy file {}", path.display()))?;
        let mut file: DeployFile = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse deploy file {}", path.display()))?;
        if let Some(dir) = path.parent() {
            file.certificate_file = dir.join(&file.certificate_file);
            file.private_key_file = dir.join(&file.private_key_file);
        }
        Ok(file)
    }
    /// Reads the PEM files and assembles the deployer input.
    pub fn to_option(&self) -> Result<DeployerOption> {
        let certificate = read_pem(&self.certificate_file, |tag| tag == "CERTIFICATE")?;
        let private_key = read_pem(&self.private_key_file, |tag| tag.ends_with("PRIVATE KEY"))?;
        Ok(DeployerOption {
            access: serde_json::to_string(&self.access)?,
            access_record: self.access_record.clone(),
            certificate: Certificate {
                certificate,
                private_key,
            },
            domain: self.domain.clone(),
            deploy_config: self.deploy_config.clone(),
        })
    }
}

fn read_pem(path: &Path, accept_tag: impl Fn(&str) -> bool) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let items = pem::parse_many(&text)
        .map_err(Error::new)
        .with_context(|| format!("Failed to parse PEM file {}", path.display()))?;
    if !items.iter().any(|item| accept_tag(&item.tag)) {
        return Err(anyhow!(
            "{} does not contain the expected PEM block",
            path.display()
        ));
    }
    Ok(text)
}
