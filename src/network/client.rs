use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::interceptor::Interceptor;
use crate::config::ApiConfig;

/// Failure of a single HTTP exchange before a response could be handed back.
#[derive(Debug, Error)]
pub enum CallError {
    /// The request could not be built (bad URL, unserializable body).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A 401 on an authenticated request; the local session was cleared.
    #[error("Session expired. Please login again.")]
    SessionExpired,

    /// Anything the HTTP transport reported.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Status line of a received response, as seen by interceptors.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub method: Method,
    pub path: String,
    pub status: u16,
    /// Whether the request carried an `Authorization` header.
    pub authenticated: bool,
}

/// Fully read response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Description of one endpoint call, relative to the API base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Result<Vec<u8>, String>>,
}

impl ApiRequest {
    /// `path` is split on `/`; use [`ApiRequest::segment`] for values that
    /// may themselves contain slashes or need escaping.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one percent-encoded path segment.
    pub fn segment(mut self, value: impl ToString) -> Self {
        self.segments.push(value.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_vec(body).map_err(|e| e.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

/// HTTP client bound to the configured API base URL.
///
/// Interceptors see every request before it is sent (in registration order)
/// and every response status before the body is read (in reverse order).
pub struct ApiClient {
    client: Client,
    base_url: Url,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, CallError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| CallError::InvalidRequest(format!("base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CallError::InvalidRequest(format!(
                "base URL cannot have paths: {}",
                config.base_url
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            interceptors: Vec::new(),
        })
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Execute `request` through the interceptor chain and read the body.
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, CallError> {
        let request_id = Uuid::new_v4();
        let url = self.url_for(&request)?;
        let path = request.path();
        let method = request.method.clone();

        let mut builder = self.client.request(method.clone(), url);
        if let Some(body) = request.body {
            let body = body.map_err(CallError::InvalidRequest)?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let mut outbound = builder.build()?;

        for interceptor in &self.interceptors {
            interceptor.on_request(&mut outbound)?;
        }
        let authenticated = outbound.headers().contains_key(AUTHORIZATION);

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            authenticated,
            "Sending request"
        );

        let response = self.client.execute(outbound).await.map_err(|e| {
            tracing::debug!(request_id = %request_id, error = %e, "Transport failure");
            CallError::Transport(e)
        })?;

        let head = ResponseHead {
            method,
            path,
            status: response.status().as_u16(),
            authenticated,
        };
        tracing::debug!(request_id = %request_id, status = head.status, "Response received");

        for interceptor in self.interceptors.iter().rev() {
            interceptor.on_response(&head)?;
        }

        let body = response.bytes().await?;
        Ok(HttpResponse {
            status: head.status,
            body: body.to_vec(),
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, CallError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                CallError::InvalidRequest(format!("base URL cannot have paths: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(&request.segments);
        }
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
