//! HTTP transport seam.
//!
//! Dispatchers only ever talk to `Transport`; `ReqwestTransport` is the
//! production implementation and tests substitute a mock. A transport
//! returns every status as data: classifying 4xx/5xx is the `api` module's
//! job, and only I/O failures come back as `Err`.

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{PineconeError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, API_KEY_HEADER};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one round trip. The response body is read in full.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    dump: bool,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(PineconeError::transport)?;
        Ok(Self {
            client,
            dump: config.debug(),
        })
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client, dump: bool) -> Self {
        Self { client, dump }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        if self.dump {
            let headers: Vec<(&str, &str)> = request
                .headers
                .iter()
                .filter(|(k, _)| !k.eq_ignore_ascii_case(API_KEY_HEADER))
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            debug!(
                method = %request.method,
                url = %request.url,
                ?headers,
                body = request.body.as_deref().unwrap_or(""),
                "http request"
            );
        }

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(PineconeError::transport)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(PineconeError::transport)?;

        if self.dump {
            debug!(status, body = %body, "http response");
        } else {
            debug!(status, "http response");
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
