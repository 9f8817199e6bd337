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

use crate::deploy_file::DeployFile;
use crate::runtime::hyper_fetcher::HyperFetcher;
use anyhow::Result;
use clap::Parser;
use cos_deployer::service::tencent::SslClient;
use cos_deployer::{CosDeployer, Deployer};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Parser)]
pub struct Opts {
    /// A YAML file describing the access, certificate files and target
    /// bucket domain.
    #[clap(long, value_name = "FILE_NAME")]
    config: String,
}

pub async fn main(opts: Opts) -> Result<()> {
    let deploy_file = DeployFile::read(&opts.config)?;
    let option = deploy_file.to_option()?;
    let mut deployer = CosDeployer::try_with_service(option, |credential| {
        let client = SslClient::new(credential, HyperFetcher::new());
        match &deploy_file.endpoint {
            Some(endpoint) => client.with_endpoint(endpoint),
            None => Ok(client),
        }
    })?;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping before the next request");
                cancel.cancel();
            }
        })
    };
    info!(
        deployer = %deployer.id(),
        target = %deployer.target().instance_id(),
        "deploying certificate"
    );
    let result = deployer.deploy(&cancel).await;
    ctrl_c.abort();
    for line in deployer.info() {
        println!("{}", line);
    }
    result?;
    Ok(())
}
