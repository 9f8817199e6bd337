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

use anyhow::{anyhow, Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct HttpRequest {
    pub body: Vec<u8>,
    pub headers: HeaderFields,
    pub method: Method,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct HttpResponse {
    pub body: Vec<u8>,
    pub headers: HeaderFields,
    pub status: u16,
}

pub type HeaderFields = Vec<(String, String)>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Method {
    Get,
    Post,
}

impl HttpRequest {
    /// Returns the value of the first header matching `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a HeaderFields, name: &str) -> Option<&'a str> {
    headers.iter().find_map(|(k, v)| {
        if k.eq_ignore_ascii_case(name) {
            Some(v.as_str())
        } else {
            None
        }
    })
}

impl TryFrom<HttpRequest> for ::http::Request<Vec<u8>> {
    type Error = Error;
    fn try_from(input: HttpRequest) -> Result<Self> {
        let method = match input.method {
            Method::Get => ::http::Method::GET,
            Method::Post => ::http::Method::POST,
        };
        let mut builder = ::http::Request::builder()
            .method(method)
            .uri(input.url.as_str());
        for (name, value) in &input.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(input.body)
            .map_err(|e| Error::new(e).context("Failed to build http::Request"))
    }
}

impl TryFrom<::http::Response<Vec<u8>>> for HttpResponse {
    type Error = Error;
    fn try_from(input: ::http::Response<Vec<u8>>) -> Result<Self> {
        let status = input.status().as_u16();
        let headers = input
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value
                    .to_str()
                    .map_err(|_| anyhow!("Header {} is not a visible ASCII string", name))?;
                Ok((name.as_str().to_string(), value.to_string()))
            })
            .collect::<Result<HeaderFields>>()?;
        Ok(HttpResponse {
            body: input.into_body(),
            headers,
            status,
        })
    }
}
