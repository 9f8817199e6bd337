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

//! A [`Fetcher`] returning pre-defined responses, to be used in unit testing.

use super::Fetcher;
use crate::http::{HttpRequest, HttpResponse};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    sync::{mpsc, Mutex},
    time::timeout,
};

pub struct MockFetcher {
    request_sender: mpsc::Sender<HttpRequest>,
    response_receiver: Arc<Mutex<mpsc::Receiver<HttpResponse>>>,
    time_limit: Duration,
}

pub struct MockServer {
    request_receiver: mpsc::Receiver<HttpRequest>,
    response_sender: mpsc::Sender<HttpResponse>,
    time_limit: Duration,
}

pub fn create() -> (MockFetcher, MockServer) {
    let (request_sender, request_receiver) = mpsc::channel(1);
    let (response_sender, response_receiver) = mpsc::channel(1);
    let mock_fetcher = MockFetcher {
        request_sender,
        response_receiver: Arc::new(Mutex::new(response_receiver)),
        time_limit: Duration::from_secs(1),
    };
    let mock_server = MockServer {
        request_receiver,
        response_sender,
        time_limit: Duration::from_secs(1),
    };
    (mock_fetcher, mock_server)
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request_url = request.url.clone();
        self.request_sender
            .send(request)
            .await
            .map_err(|_e| anyhow!("MockServer has been dropped"))?;
        timeout(self.time_limit, self.response_receiver.lock().await.recv())
            .await
            .map_err(|_e| {
                anyhow!(
                    "Failed to get response for URL \"{}\" within time limit, \
                    did you set up \"handle_next_request\" on the MockServer side?",
                    request_url,
                )
            })?
            .ok_or_else(|| anyhow!("No more message"))
    }
}

impl MockServer {
    /// Waits for the next request, checks that it equals `expected_request`,
    /// and answers it with `response`.
    pub async fn handle_next_request(
        &mut self,
        expected_request: HttpRequest,
        response: HttpResponse,
    ) -> Result<()> {
        let actual_request = self.receive(&expected_request.url).await?;
        if actual_request.as_ref() != Some(&expected_request) {
            return Err(anyhow!(
                "Actual {:?}\n Expected {:?}",
                actual_request,
                expected_request
            ));
        }
        self.respond(response).await
    }
    /// Waits for the next request and answers it with `response`, returning
    /// the request so that the caller can inspect it.
    pub async fn capture_next_request(&mut self, response: HttpResponse) -> Result<HttpRequest> {
        let actual_request = self
            .receive("<any>")
            .await?
            .ok_or_else(|| anyhow!("MockFetcher has been dropped"))?;
        self.respond(response).await?;
        Ok(actual_request)
    }
    async fn receive(&mut self, url: &str) -> Result<Option<HttpRequest>> {
        timeout(self.time_limit, self.request_receiver.recv())
            .await
            .map_err(|_e| {
                anyhow!(
                    "Failed to get request for URL \"{}\" within time limit, \
                    did you call \"fetch\" on the MockFetcher side?",
                    url,
                )
            })
    }
    async fn respond(&self, response: HttpResponse) -> Result<()> {
        self.response_sender
            .send(response)
            .await
            .map_err(|_e| anyhow!("MockFetcher has been dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    fn get_request(url: &str) -> HttpRequest {
        HttpRequest {
            body: vec![],
            method: Method::Get,
            headers: vec![],
            url: url.to_string(),
        }
    }
    fn ok_response(body: &[u8]) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![],
            body: body.to_vec(),
        }
    }
    // The server side calls `handle_next_request` for each `fetch` at client
    // side.
    #[tokio::test]
    async fn it_works() {
        let (fetcher, mut server) = create();
        let server_thread = async {
            server
                .handle_next_request(get_request("https://foo.com/1"), ok_response(&[1, 2, 3]))
                .await
                .unwrap();
            let captured = server
                .capture_next_request(ok_response(&[7, 8, 9]))
                .await
                .unwrap();
            assert_eq!(captured.url, "https://foo.com/2");
        };
        let client_thread = async {
            let response = fetcher.fetch(get_request("https://foo.com/1")).await.unwrap();
            assert_eq!(response.body, vec![1, 2, 3]);
            let response = fetcher.fetch(get_request("https://foo.com/2")).await.unwrap();
            assert_eq!(response.body, vec![7, 8, 9]);
        };
        tokio::join!(server_thread, client_thread);
    }
    // In the case client side actual request does not match against server
    // side expected request, both server and client will get an error.
    #[tokio::test]
    async fn req_mismatch() {
        let (fetcher, mut server) = create();
        let server_thread = async {
            assert!(server
                .handle_next_request(get_request("https://foo.com"), ok_response(&[1, 2, 3]))
                .await
                .is_err());
        };
        let client_thread = async {
            assert!(fetcher.fetch(get_request("https://bar.com")).await.is_err())
        };
        tokio::join!(server_thread, client_thread);
    }
}
