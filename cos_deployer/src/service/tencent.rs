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

//! A [`CertificateService`] backed by the Tencent Cloud SSL certificate API.

use super::signer::{self, SigningInput, CONTENT_TYPE};
use super::{
    CertificateService, DeployCertificateInstanceRequest, DeployCertificateInstanceResponse,
    UploadCertificateRequest, UploadCertificateResponse,
};
use crate::access::Credential;
use crate::fetcher::Fetcher;
use crate::http::{HttpRequest, HttpResponse, Method};
use anyhow::{anyhow, Context, Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://ssl.tencentcloudapi.com/";
const DEFAULT_HOST: &str = "ssl.tencentcloudapi.com";
pub const SERVICE: &str = "ssl";
pub const API_VERSION: &str = "2019-12-05";

const ACTION_UPLOAD_CERTIFICATE: &str = "UploadCertificate";
const ACTION_DEPLOY_CERTIFICATE_INSTANCE: &str = "DeployCertificateInstance";

/// An error reported by the API inside a successful HTTP response.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("[TencentCloudSDKError] Code={code}, Message={message}, RequestId={request_id}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub request_id: String,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    code: String,
    message: String,
}

pub struct SslClient<F: Fetcher> {
    credential: Credential,
    fetcher: F,
    endpoint: String,
    host: String,
    region: Option<String>,
    now: fn() -> SystemTime,
}

impl<F: Fetcher> SslClient<F> {
    pub fn new(credential: Credential, fetcher: F) -> Self {
        SslClient {
            credential,
            fetcher,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            host: DEFAULT_HOST.to_string(),
            region: None,
            now: SystemTime::now,
        }
    }
    /// Sends requests to `endpoint` instead of the public SSL endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint).with_context(|| format!("Invalid endpoint {:?}", endpoint))?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow!("Endpoint {:?} has no host", endpoint))?;
        self.host = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        self.endpoint = url.to_string();
        Ok(self)
    }
    /// Sets the `X-TC-Region` header. The SSL service is global, so this is
    /// normally left unset.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
    pub fn with_clock(mut self, now: fn() -> SystemTime) -> Self {
        self.now = now;
        self
    }
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
    async fn call<Req, Resp>(&self, action: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request)
            .with_context(|| format!("Failed to serialize {} request", action))?;
        let timestamp = (self.now)()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_secs();
        let timestamp = i64::try_from(timestamp).context("System clock is out of range")?;
        let authorization = signer::authorization(
            &self.credential,
            &SigningInput {
                host: &self.host,
                service: SERVICE,
                action,
                payload: &payload,
                timestamp,
            },
        )?;
        let mut headers = vec![
            ("Authorization".to_string(), authorization),
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ("Host".to_string(), self.host.clone()),
            ("X-TC-Action".to_string(), action.to_string()),
            ("X-TC-Timestamp".to_string(), timestamp.to_string()),
            ("X-TC-Version".to_string(), API_VERSION.to_string()),
        ];
        if let Some(region) = &self.region {
            headers.push(("X-TC-Region".to_string(), region.clone()));
        }
        let http_request = HttpRequest {
            body: payload,
            headers,
            method: Method::Post,
            url: self.endpoint.clone(),
        };
        tracing::debug!(action, endpoint = %self.endpoint, "sending tencent cloud api request");
        let response = self
            .fetcher
            .fetch(http_request)
            .await
            .with_context(|| format!("Failed to send {} request", action))?;
        parse_response(action, response)
    }
}

fn parse_response<Resp: DeserializeOwned>(action: &str, response: HttpResponse) -> Result<Resp> {
    if !response.is_success() {
        return Err(anyhow!(
            "{} responded with HTTP status {}: {}",
            action,
            response.status,
            String::from_utf8_lossy(&response.body)
        ));
    }
    let Envelope { response } = serde_json::from_slice(&response.body)
        .with_context(|| format!("Failed to parse {} response", action))?;
    if let Some(error) = response.get("Error") {
        let ErrorBody { code, message } = serde_json::from_value(error.clone())
            .with_context(|| format!("Failed to parse {} error", action))?;
        let request_id = response
            .get("RequestId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(Error::new(ApiError {
            code,
            message,
            request_id,
        }));
    }
    serde_json::from_value(response).with_context(|| format!("Unexpected {} response", action))
}

#[async_trait]
impl<F: Fetcher> CertificateService for SslClient<F> {
    async fn upload_certificate(
        &self,
        request: UploadCertificateRequest,
    ) -> Result<UploadCertificateResponse> {
        self.call(ACTION_UPLOAD_CERTIFICATE, &request).await
    }
    async fn deploy_certificate_instance(
        &self,
        request: DeployCertificateInstanceRequest,
    ) -> Result<DeployCertificateInstanceResponse> {
        self.call(ACTION_DEPLOY_CERTIFICATE_INSTANCE, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::mock_fetcher;
    use crate::service::{RESOURCE_TYPE_COS, STATUS_ENABLED};
    use serde_json::json;
    use std::time::Duration;

    fn fixed_clock() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1551113065)
    }
    fn json_response(status: u16, body: Value) -> HttpResponse {
        HttpResponse {
            body: serde_json::to_vec(&body).unwrap(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            status,
        }
    }
    fn upload_request() -> UploadCertificateRequest {
        UploadCertificateRequest {
            certificate_public_key: "CERT".to_string(),
            certificate_private_key: "KEY".to_string(),
            alias: "example.com_abc123".to_string(),
            repeatable: false,
        }
    }
    #[tokio::test]
    async fn upload_sends_signed_request() {
        let (fetcher, mut server) = mock_fetcher::create();
        let client = SslClient::new(Credential::new("AKIDEXAMPLE", "secret"), fetcher)
            .with_clock(fixed_clock);
        let server_thread = async {
            let response = json_response(
                200,
                json!({"Response": {"CertificateId": "8x1eUSSl", "RequestId": "req-1"}}),
            );
            server.capture_next_request(response).await.unwrap()
        };
        let client_thread = client.upload_certificate(upload_request());
        let (request, response) = tokio::join!(server_thread, client_thread);
        let response = response.unwrap();
        assert_eq!(response.certificate_id, "8x1eUSSl");
        assert_eq!(response.request_id.as_deref(), Some("req-1"));

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, DEFAULT_ENDPOINT);
        assert_eq!(request.header("X-TC-Action"), Some("UploadCertificate"));
        assert_eq!(request.header("X-TC-Version"), Some("2019-12-05"));
        assert_eq!(request.header("X-TC-Timestamp"), Some("1551113065"));
        assert_eq!(request.header("Host"), Some("ssl.tencentcloudapi.com"));
        assert_eq!(request.header("X-TC-Region"), None);
        assert_eq!(
            serde_json::from_slice::<Value>(&request.body).unwrap(),
            json!({
                "CertificatePublicKey": "CERT",
                "CertificatePrivateKey": "KEY",
                "Alias": "example.com_abc123",
                "Repeatable": false,
            })
        );
        let expected_authorization = signer::authorization(
            &Credential::new("AKIDEXAMPLE", "secret"),
            &SigningInput {
                host: "ssl.tencentcloudapi.com",
                service: "ssl",
                action: "UploadCertificate",
                payload: &request.body,
                timestamp: 1551113065,
            },
        )
        .unwrap();
        assert_eq!(request.header("Authorization"), Some(expected_authorization.as_str()));
        assert!(expected_authorization
            .starts_with("TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2019-02-25/ssl/tc3_request, "));
    }
    #[tokio::test]
    async fn deploy_instance_with_custom_endpoint_and_region() {
        let (fetcher, mut server) = mock_fetcher::create();
        let client = SslClient::new(Credential::new("AKIDEXAMPLE", "secret"), fetcher)
            .with_endpoint("http://127.0.0.1:8080")
            .unwrap()
            .with_region("ap-guangzhou")
            .with_clock(fixed_clock);
        assert_eq!(client.endpoint(), "http://127.0.0.1:8080/");
        let server_thread = async {
            let response = json_response(
                200,
                json!({"Response": {"DeployRecordId": 35, "DeployStatus": 1, "RequestId": "req-2"}}),
            );
            server.capture_next_request(response).await.unwrap()
        };
        let client_thread = client.deploy_certificate_instance(DeployCertificateInstanceRequest {
            region: "ap-guangzhou".to_string(),
            certificate_id: "8x1eUSSl".to_string(),
            resource_type: RESOURCE_TYPE_COS.to_string(),
            status: STATUS_ENABLED,
            instance_id_list: vec!["ap-guangzhou#bucket-125#cdn.example.com".to_string()],
        });
        let (request, response) = tokio::join!(server_thread, client_thread);
        assert_eq!(
            response.unwrap(),
            DeployCertificateInstanceResponse {
                deploy_record_id: Some(35),
                deploy_status: Some(1),
                request_id: Some("req-2".to_string()),
            }
        );
        assert_eq!(request.url, "http://127.0.0.1:8080/");
        assert_eq!(request.header("Host"), Some("127.0.0.1:8080"));
        assert_eq!(request.header("X-TC-Region"), Some("ap-guangzhou"));
        assert_eq!(request.header("X-TC-Action"), Some("DeployCertificateInstance"));
    }
    #[tokio::test]
    async fn api_error_is_surfaced() {
        let (fetcher, mut server) = mock_fetcher::create();
        let client = SslClient::new(Credential::new("AKIDEXAMPLE", "secret"), fetcher);
        let server_thread = async {
            let response = json_response(
                200,
                json!({"Response": {
                    "Error": {"Code": "AuthFailure.SignatureFailure", "Message": "bad signature"},
                    "RequestId": "req-3",
                }}),
            );
            server.capture_next_request(response).await.unwrap();
        };
        let (_, result) = tokio::join!(server_thread, client.upload_certificate(upload_request()));
        let err = result.unwrap_err();
        let api_error = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api_error.code, "AuthFailure.SignatureFailure");
        assert_eq!(api_error.request_id, "req-3");
        assert!(err.to_string().contains("bad signature"));
    }
    #[tokio::test]
    async fn http_failure_is_surfaced() {
        let (fetcher, mut server) = mock_fetcher::create();
        let client = SslClient::new(Credential::new("AKIDEXAMPLE", "secret"), fetcher);
        let server_thread = async {
            let response = HttpResponse {
                body: b"upstream unavailable".to_vec(),
                headers: vec![],
                status: 503,
            };
            server.capture_next_request(response).await.unwrap();
        };
        let (_, result) = tokio::join!(server_thread, client.upload_certificate(upload_request()));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("503"), "{}", message);
        assert!(message.contains("upstream unavailable"), "{}", message);
    }
    #[tokio::test]
    async fn malformed_body_is_surfaced() {
        let (fetcher, mut server) = mock_fetcher::create();
        let client = SslClient::new(Credential::new("AKIDEXAMPLE", "secret"), fetcher);
        let server_thread = async {
            let response = json_response(200, json!({"Response": {"RequestId": "req-4"}}));
            server.capture_next_request(response).await.unwrap();
        };
        let (_, result) = tokio::join!(server_thread, client.upload_certificate(upload_request()));
        assert!(result.is_err());
    }
    #[test]
    fn invalid_endpoint() {
        let client = SslClient::new(Credential::new("a", "b"), crate::fetcher::NullFetcher);
        assert!(client.with_endpoint("not a url").is_err());
    }
}
