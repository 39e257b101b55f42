//! Conversion of raw HTTP outcomes into [`ApiResult`]s.

use std::error::Error as StdError;
use std::future::Future;

use futures_util::future;
use futures_util::stream::{self, BoxStream, StreamExt};
use serde::de::DeserializeOwned;

use super::client::{CallError, HttpResponse};
use super::result::{ApiError, ApiResult, ErrorKind};

/// Sequence produced by [`safe_api_call`]: `Loading`, then one terminal.
pub type ApiStream<T> = BoxStream<'static, ApiResult<T>>;

/// Decoding of a successful response body.
pub trait ResponseBody: Sized {
    /// `Ok(None)` means the response carried no body.
    fn from_body(body: &[u8]) -> Result<Option<Self>, serde_json::Error>;
}

impl<T: DeserializeOwned> ResponseBody for T {
    fn from_body(body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        if is_empty_body(body) {
            return Ok(None);
        }
        serde_json::from_slice(body).map(Some)
    }
}

/// Payload for endpoints whose success carries nothing worth decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoContent;

impl ResponseBody for NoContent {
    fn from_body(_body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        Ok(Some(NoContent))
    }
}

/// Wrap an HTTP call into a two-element sequence.
///
/// The call future is not polled until `Loading` has been yielded. The
/// sequence always ends after the single `Success` or `Error`.
pub fn safe_api_call<T, F>(call: F) -> ApiStream<T>
where
    T: ResponseBody + Send + 'static,
    F: Future<Output = Result<HttpResponse, CallError>> + Send + 'static,
{
    stream::once(future::ready(ApiResult::Loading))
        .chain(stream::once(resolve(call)))
        .boxed()
}

/// Run an HTTP call and return only its terminal result.
pub async fn resolve<T, F>(call: F) -> ApiResult<T>
where
    T: ResponseBody,
    F: Future<Output = Result<HttpResponse, CallError>>,
{
    let result = classify(call.await);
    if let ApiResult::Error(err) = &result {
        tracing::debug!(kind = %err.kind, code = ?err.code, message = %err.message, "API call failed");
    }
    result
}

fn classify<T: ResponseBody>(outcome: Result<HttpResponse, CallError>) -> ApiResult<T> {
    match outcome {
        Ok(response) if response.is_success() => match T::from_body(&response.body) {
            Ok(Some(data)) => ApiResult::Success(data),
            Ok(None) => ApiResult::Error(ApiError::new(
                ErrorKind::ApiError,
                "Response body is null",
            )),
            Err(e) => ApiResult::Error(ApiError::new(ErrorKind::Unknown, format!("Error: {}", e))),
        },
        Ok(response) => {
            let kind = match response.status {
                401 | 403 => ErrorKind::AuthError,
                _ => ErrorKind::ApiError,
            };
            ApiResult::Error(
                ApiError::new(
                    kind,
                    format!("API call failed with code: {}", response.status),
                )
                .with_code(response.status),
            )
        }
        Err(err @ CallError::SessionExpired) => {
            ApiResult::Error(ApiError::new(ErrorKind::AuthError, err.to_string()).with_code(401))
        }
        Err(err @ CallError::InvalidRequest(_)) => {
            ApiResult::Error(ApiError::new(ErrorKind::Unknown, format!("Error: {}", err)))
        }
        Err(CallError::Transport(err)) => ApiResult::Error(classify_transport(&err)),
    }
}

fn classify_transport(err: &reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ErrorKind::Timeout, "Connection timed out. Please try again.");
    }
    if is_dns_failure(err) {
        return ApiError::new(
            ErrorKind::Network,
            "No internet connection. Please check your network settings.",
        );
    }
    if err.is_connect() {
        return ApiError::new(
            ErrorKind::Network,
            "Failed to connect to server. Please check your network.",
        );
    }
    if err.is_decode() || err.is_builder() || err.is_redirect() {
        return ApiError::new(ErrorKind::Unknown, format!("Error: {}", err));
    }
    if err.is_request() || err.is_body() || has_io_source(err) {
        return ApiError::new(ErrorKind::Network, format!("Network error: {}", err));
    }
    ApiError::new(ErrorKind::Unknown, format!("Error: {}", err))
}

fn is_dns_failure(err: &reqwest::Error) -> bool {
    sources(err).any(|source| {
        let text = source.to_string().to_lowercase();
        text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
    })
}

fn has_io_source(err: &reqwest::Error) -> bool {
    sources(err).any(|source| source.is::<std::io::Error>())
}

fn sources<'a>(err: &'a (dyn StdError + 'static)) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |e| (*e).source())
}

fn is_empty_body(body: &[u8]) -> bool {
    let trimmed = body.trim_ascii();
    trimmed.is_empty() || trimmed == b"null"
}
