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

pub mod mock_fetcher;

use crate::http::{HttpRequest, HttpResponse};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// An interface for sending requests over the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// A [`Fetcher`] that fails every request, used when no transport is wired.
pub struct NullFetcher;

#[async_trait]
impl Fetcher for NullFetcher {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        Err(anyhow!(
            "No fetcher is configured, cannot send request to {}",
            request.url
        ))
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).fetch(request).await
    }
}
