use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::BoxError;

/// A protocol error produced by the query engine.
///
/// Unlike any other failure, it is always turned into an HTTP response: the status and headers
/// are applied as is, and the message is written as the body. The message is expected to be a
/// serialized GraphQL error response, but plain text is accepted too.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HttpQueryError {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub message: String,
}

impl HttpQueryError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HttpQueryError {
            status,
            headers: HeaderMap::new(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Failure of a query engine call.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Shaped into the HTTP response.
    #[error(transparent)]
    Http(#[from] HttpQueryError),
    /// Forwarded untouched to the host framework's error handling.
    #[error("{0}")]
    Opaque(BoxError),
}

impl QueryError {
    pub fn opaque(error: impl Into<BoxError>) -> Self {
        QueryError::Opaque(error.into())
    }
}

/// Invalid query handler setup, reported before any request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("the GraphQL query handler requires options")]
    MissingOptions,
    #[error("the GraphQL query handler expects exactly one options value, got {0}")]
    TooManyOptions(usize),
}
