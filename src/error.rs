use strum::Display;
use thiserror::Error;

/// Failures while wiring a behavior to the server-rendered page.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum PageError {
    #[error("required element not found: {0}")]
    MissingElement(String),

    #[error("dom error: {0}")]
    Dom(String),
}

impl PageError {
    pub(crate) fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement(selector.into())
    }

    pub(crate) fn dom(e: wasm_bindgen::JsValue) -> Self {
        Self::Dom(format!("{e:?}"))
    }
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;
