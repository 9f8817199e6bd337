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

//! TC3-HMAC-SHA256 request signing for Tencent Cloud API 3.0.
//!
//! https://www.tencentcloud.com/document/api/1007/31324

use crate::access::Credential;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host;x-tc-action";

pub struct SigningInput<'a> {
    pub host: &'a str,
    pub service: &'a str,
    pub action: &'a str,
    pub payload: &'a [u8],
    /// Seconds since the Unix epoch; must match the `X-TC-Timestamp` header.
    pub timestamp: i64,
}

/// Computes the `Authorization` header value of a `POST /` request.
pub fn authorization(credential: &Credential, input: &SigningInput<'_>) -> Result<String> {
    let date = DateTime::<Utc>::from_timestamp(input.timestamp, 0)
        .ok_or_else(|| anyhow!("Timestamp {} is out of range", input.timestamp))?
        .format("%Y-%m-%d")
        .to_string();
    let credential_scope = format!("{}/{}/tc3_request", date, input.service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        input.timestamp,
        credential_scope,
        sha256_hex(canonical_request(input).as_bytes()),
    );
    let secret_date = hmac_sha256(format!("TC3{}", credential.secret_key()).as_bytes(), &date)?;
    let secret_service = hmac_sha256(&secret_date, input.service)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, &string_to_sign)?);
    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM,
        credential.secret_id(),
        credential_scope,
        SIGNED_HEADERS,
        signature
    ))
}

fn canonical_request(input: &SigningInput<'_>) -> String {
    let canonical_headers = format!(
        "content-type:{}\nhost:{}\nx-tc-action:{}\n",
        CONTENT_TYPE,
        input.host,
        input.action.to_ascii_lowercase()
    );
    format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers,
        SIGNED_HEADERS,
        sha256_hex(input.payload)
    )
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], message: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| anyhow!("Invalid HMAC key: {}", e))?;
    mac.update(message.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    const PAYLOAD: &[u8] = br#"{"Alias":"example.com_abc123"}"#;
    fn input(timestamp: i64) -> SigningInput<'static> {
        SigningInput {
            host: "ssl.tencentcloudapi.com",
            service: "ssl",
            action: "UploadCertificate",
            payload: PAYLOAD,
            timestamp,
        }
    }
    #[test]
    fn canonical_request_layout() {
        assert_eq!(
            canonical_request(&input(1551113065)),
            "POST\n/\n\n\
            content-type:application/json; charset=utf-8\n\
            host:ssl.tencentcloudapi.com\n\
            x-tc-action:uploadcertificate\n\n\
            content-type;host;x-tc-action\n\
            b200a43266e40802068e520570cb5a19899d606e3d60cd2e4bb87e259eaaf54e"
        );
    }
    #[test]
    fn known_signature() {
        let credential = Credential::new("AKIDEXAMPLE", "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE");
        assert_eq!(
            authorization(&credential, &input(1551113065)).unwrap(),
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2019-02-25/ssl/tc3_request, \
            SignedHeaders=content-type;host;x-tc-action, \
            Signature=b39c60a5d5d2b59beefba5be0d2c37fb8a74cbdff81570c725ffa04914c2cfcf"
        );
    }
    #[test]
    fn signature_depends_on_secret_and_time() {
        let a = Credential::new("AKIDEXAMPLE", "key-a");
        let b = Credential::new("AKIDEXAMPLE", "key-b");
        assert_ne!(
            authorization(&a, &input(1551113065)).unwrap(),
            authorization(&b, &input(1551113065)).unwrap()
        );
        assert_ne!(
            authorization(&a, &input(1551113065)).unwrap(),
            authorization(&a, &input(1551113066)).unwrap()
        );
    }
    #[test]
    fn timestamp_out_of_range() {
        let credential = Credential::new("AKIDEXAMPLE", "key");
        assert!(authorization(&credential, &input(i64::MAX)).is_err());
    }
}
