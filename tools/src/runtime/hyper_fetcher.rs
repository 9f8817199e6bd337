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

//! A [`Fetcher`] sending requests to the Tencent Cloud API over hyper.

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use cos_deployer::fetcher::Fetcher;
use cos_deployer::http::{HttpRequest, HttpResponse};
use hyper::{client::connect::HttpConnector, Body, Client};
use hyper_tls::HttpsConnector;

pub struct HyperFetcher {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HyperFetcher {
    pub fn new() -> Self {
        HyperFetcher {
            client: Client::builder().build(HttpsConnector::new()),
        }
    }
}

impl Default for HyperFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn to_hyper_request(request: HttpRequest) -> Result<http::Request<Body>> {
    let url = request.url.clone();
    let request: http::Request<Vec<u8>> = request
        .try_into()
        .map_err(|e: Error| e.context(format!("Invalid request to {}", url)))?;
    Ok(request.map(Body::from))
}

async fn from_hyper_response(response: http::Response<Body>) -> Result<HttpResponse> {
    let (parts, body) = response.into_parts();
    let body = hyper::body::to_bytes(body)
        .await
        .context("Failed to read response body")?;
    http::Response::from_parts(parts, body.to_vec()).try_into()
}

#[async_trait]
impl Fetcher for HyperFetcher {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        let response = self
            .client
            .request(to_hyper_request(request)?)
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;
        from_hyper_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cos_deployer::http::Method;
    #[test]
    fn request_keeps_method_headers_and_body() {
        let request = HttpRequest {
            body: br#"{"Alias":"a"}"#.to_vec(),
            headers: vec![("X-TC-Action".to_string(), "UploadCertificate".to_string())],
            method: Method::Post,
            url: "https://ssl.tencentcloudapi.com/".to_string(),
        };
        let request = to_hyper_request(request).unwrap();
        assert_eq!(request.method(), &http::Method::POST);
        assert_eq!(request.uri(), "https://ssl.tencentcloudapi.com/");
        assert_eq!(request.headers()["x-tc-action"], "UploadCertificate");
    }
    #[test]
    fn invalid_url_names_the_url() {
        let request = HttpRequest {
            body: vec![],
            headers: vec![],
            method: Method::Get,
            url: "not a url".to_string(),
        };
        let err = to_hyper_request(request).unwrap_err();
        assert!(err.to_string().contains("not a url"), "{:#}", err);
    }
    #[tokio::test]
    async fn response_body_is_collected() {
        let response = http::Response::builder()
            .status(200)
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"Response":{}}"#))
            .unwrap();
        let response = from_hyper_response(response).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.body, br#"{"Response":{}}"#);
    }
    #[tokio::test]
    async fn unreachable_endpoint_fails() {
        let fetcher = HyperFetcher::new();
        let request = HttpRequest {
            body: vec![],
            headers: vec![],
            method: Method::Post,
            url: "http://127.0.0.1:9/".to_string(),
        };
        let err = fetcher.fetch(request).await.unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:9"), "{:#}", err);
    }
}
