use std::{future::Future, sync::Arc};

use http::{header, request::Parts, HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;

use crate::{query_string, BoxError, BuildError, HttpQueryError, Options, QueryError};

/// What the query engine receives for a single HTTP call.
pub struct HttpQueryRequest<O> {
    pub method: Method,
    pub options: Arc<O>,
    /// The JSON body for POST requests, the query string parameters otherwise.
    pub query: Value,
}

/// The external collaborator parsing, validating and executing GraphQL operations.
///
/// On success it returns the already serialized GraphQL response.
pub trait QueryEngine: Send + Sync + 'static {
    type Options: Send + Sync + 'static;

    fn run_http_query(
        &self,
        request: &Parts,
        query: HttpQueryRequest<Self::Options>,
    ) -> impl Future<Output = Result<String, QueryError>> + Send;
}

pub struct QueryHandlerBuilder<E: QueryEngine> {
    engine: E,
    options: Vec<Options<E::Options>>,
}

impl<E: QueryEngine> QueryHandlerBuilder<E> {
    #[must_use]
    pub fn options(mut self, options: impl Into<Options<E::Options>>) -> Self {
        self.options.push(options.into());
        self
    }

    /// Exactly one options value must have been provided.
    pub fn build(mut self) -> Result<QueryHandler<E>, BuildError> {
        if self.options.len() > 1 {
            return Err(BuildError::TooManyOptions(self.options.len()));
        }

        let options = self.options.pop().ok_or(BuildError::MissingOptions)?;

        Ok(QueryHandler {
            engine: self.engine,
            options,
        })
    }
}

/// Forwards HTTP requests to the query engine and shapes its answer.
pub struct QueryHandler<E: QueryEngine> {
    engine: E,
    options: Options<E::Options>,
}

impl<E: QueryEngine> QueryHandler<E> {
    pub fn builder(engine: E) -> QueryHandlerBuilder<E> {
        QueryHandlerBuilder {
            engine,
            options: Vec::new(),
        }
    }

    /// Runs the request through the engine without touching any transport.
    ///
    /// Protocol errors are part of the returned [QueryResponse]. Any other failure is returned
    /// as is and must be handled by the host framework.
    pub async fn execute(&self, parts: &Parts, body: &[u8]) -> Result<QueryResponse, BoxError> {
        let query = match extract_query(parts, body) {
            Ok(query) => query,
            Err(error) => return Ok(QueryResponse::from_http_error(error)),
        };

        let options = match self.options.resolve(parts).await {
            Ok(options) => options,
            Err(error) => {
                let message = format!("Invalid options provided to the GraphQL server: {error}");
                let error = HttpQueryError::new(StatusCode::INTERNAL_SERVER_ERROR, message);

                return Ok(QueryResponse::from_http_error(error));
            }
        };

        let request = HttpQueryRequest {
            method: parts.method.clone(),
            options,
            query,
        };

        match self.engine.run_http_query(parts, request).await {
            Ok(payload) => Ok(QueryResponse::success(payload)),
            Err(QueryError::Http(error)) => {
                tracing::debug!(status = %error.status, "GraphQL request failed");
                Ok(QueryResponse::from_http_error(error))
            }
            Err(QueryError::Opaque(error)) => {
                tracing::debug!("forwarding query engine error: {error}");
                Err(error)
            }
        }
    }
}

fn extract_query(parts: &Parts, body: &[u8]) -> Result<Value, HttpQueryError> {
    if parts.method != Method::POST {
        return Ok(Value::Object(query_string::parse(parts.uri.query())));
    }

    if body.is_empty() {
        return Err(HttpQueryError::new(StatusCode::BAD_REQUEST, "POST body missing."));
    }

    serde_json::from_slice(body).map_err(|err| {
        HttpQueryError::new(StatusCode::BAD_REQUEST, format!("POST body is not valid JSON: {err}"))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Serialized GraphQL response from the engine, untouched.
    Payload(String),
    /// JSON error response, `data` is always null.
    Error(Value),
    /// Error message which wasn't a JSON object.
    Message(String),
}

impl ResponseBody {
    fn into_string(self) -> String {
        match self {
            ResponseBody::Payload(payload) => payload,
            ResponseBody::Error(value) => value.to_string(),
            ResponseBody::Message(message) => message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl QueryResponse {
    fn success(payload: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        QueryResponse {
            status: StatusCode::OK,
            headers,
            body: ResponseBody::Payload(payload),
        }
    }

    /// Error responses never carry partial data, so `data` is forced to null. A message that
    /// isn't a JSON object is kept verbatim.
    pub fn from_http_error(error: HttpQueryError) -> Self {
        let HttpQueryError {
            status,
            headers,
            message,
        } = error;

        let body = match serde_json::from_str::<Value>(&message) {
            Ok(Value::Object(mut object)) => {
                object.insert("data".to_string(), Value::Null);
                ResponseBody::Error(Value::Object(object))
            }
            _ => ResponseBody::Message(message),
        };

        QueryResponse { status, headers, body }
    }

    /// The result as seen by a caller without any transport.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    pub fn into_http(self) -> http::Response<String> {
        let mut response = http::Response::new(self.body.into_string());
        *response.headers_mut() = self.headers;
        *response.status_mut() = self.status;
        response
    }
}
