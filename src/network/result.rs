use std::fmt;

/// Classification attached to every failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No connectivity, connect failure, or another I/O problem.
    Network,
    /// The request exceeded its deadline.
    Timeout,
    /// Non-2xx, non-auth status, or a success without a body.
    ApiError,
    /// 401/403 status or an expired session.
    AuthError,
    /// Anything else, including undecodable bodies.
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::ApiError => "API_ERROR",
            ErrorKind::AuthError => "AUTH_ERROR",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// Network and timeout failures are usually cured by retrying later.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of [`ApiResult::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub code: Option<u16>,
    pub kind: ErrorKind,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            kind,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{} {}] {}", self.kind, code, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Outcome of one network call.
///
/// `Initial` is the pre-call default; a call emits `Loading` followed by
/// exactly one of `Success` or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Initial,
    Loading,
    Success(T),
    Error(ApiError),
}

impl<T> Default for ApiResult<T> {
    fn default() -> Self {
        ApiResult::Initial
    }
}

impl<T> ApiResult<T> {
    /// True for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApiResult::Success(_) | ApiResult::Error(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ApiResult::Loading)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ApiResult::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Initial => ApiResult::Initial,
            ApiResult::Loading => ApiResult::Loading,
            ApiResult::Success(data) => ApiResult::Success(f(data)),
            ApiResult::Error(err) => ApiResult::Error(err),
        }
    }

    /// Convert a terminal result into a `Result`; non-terminal states yield `None`.
    pub fn into_result(self) -> Option<Result<T, ApiError>> {
        match self {
            ApiResult::Success(data) => Some(Ok(data)),
            ApiResult::Error(err) => Some(Err(err)),
            ApiResult::Initial | ApiResult::Loading => None,
        }
    }
}
