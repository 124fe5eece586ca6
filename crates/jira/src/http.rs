//! Thin JSON-over-HTTP wrapper
//!
//! Every call yields the status code plus, where the verb has one, a body
//! normalized to `T`. A 204, an empty body, or a body that is not valid JSON
//! for `T` all become `T::default()`; only transport failures are errors.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use qa_common::Result;

/// Status plus normalized body
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: T,
}

/// Status of a call whose body is not inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOnly {
    pub status: u16,
}

/// HTTP wrapper bound to a base URL and a shared request context
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `client` carries transport-level headers (auth, content type).
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T>(&self, path: &str, params: Option<&[(&str, &str)]>) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let mut request = self.request(Method::GET, path);
        if let Some(params) = params {
            request = request.query(params);
        }
        self.send_parsed(Method::GET, path, request).await
    }

    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
        P: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, path).json(payload);
        self.send_parsed(Method::POST, path, request).await
    }

    pub async fn put<P>(&self, path: &str, payload: &P) -> Result<StatusOnly>
    where
        P: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, path).json(payload);
        let status = self.send(Method::PUT, path, request).await?.status();
        Ok(StatusOnly {
            status: status.as_u16(),
        })
    }

    pub async fn delete(&self, path: &str) -> Result<StatusOnly> {
        let request = self.request(Method::DELETE, path);
        let status = self.send(Method::DELETE, path, request).await?.status();
        Ok(StatusOnly {
            status: status.as_u16(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {} -> {}", method, path, status.as_u16());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("{} {} was rejected with {}; check JIRA_AUTH_TOKEN", method, path, status);
        }
        Ok(response)
    }

    async fn send_parsed<T>(&self, method: Method, path: &str, request: RequestBuilder) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.send(method, path, request).await?;
        let status = response.status().as_u16();
        // A body that fails mid-read is treated like a malformed one.
        let bytes = response.bytes().await.unwrap_or_default();
        Ok(ApiResponse {
            status,
            body: parse_body(status, &bytes),
        })
    }
}

/// Normalize a raw response body.
pub fn parse_body<T>(status: u16, bytes: &[u8]) -> T
where
    T: DeserializeOwned + Default,
{
    if status == StatusCode::NO_CONTENT.as_u16() {
        return T::default();
    }
    match serde_json::from_slice(bytes) {
        Ok(body) => body,
        Err(e) => {
            debug!("Response body ({} bytes, status {}) not parsed: {}", bytes.len(), status, e);
            T::default()
        }
    }
}
