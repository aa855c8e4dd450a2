pub(crate) mod graphiql;

use std::{future::Future, sync::Arc};

use http::{header, request::Parts, HeaderValue};
use serde_json::{Map, Value};

use crate::{query_string, BoxError, Options};

/// What the explorer renderer receives for a single HTTP call.
pub struct ExplorerRequest<'a, O> {
    /// Decoded query string of the request URI, empty if there is none.
    pub query_string: Map<String, Value>,
    pub options: Arc<O>,
    pub request: &'a Parts,
}

/// Produces the HTML page of an interactive GraphQL explorer.
pub trait ExplorerRenderer: Send + Sync + 'static {
    type Options: Send + Sync + 'static;

    fn render(&self, request: ExplorerRequest<'_, Self::Options>) -> impl Future<Output = Result<String, BoxError>> + Send;
}

pub struct ExplorerHandler<R: ExplorerRenderer> {
    renderer: R,
    options: Options<R::Options>,
}

impl<R: ExplorerRenderer> ExplorerHandler<R> {
    pub fn new(renderer: R, options: impl Into<Options<R::Options>>) -> Self {
        ExplorerHandler {
            renderer,
            options: options.into(),
        }
    }

    /// Any failure, from the options or the renderer, is left to the host framework.
    pub async fn render(&self, parts: &Parts) -> Result<ExplorerPage, BoxError> {
        let query_string = query_string::parse(parts.uri.query());
        let options = self.options.resolve(parts).await?;

        let html = self
            .renderer
            .render(ExplorerRequest {
                query_string,
                options,
                request: parts,
            })
            .await?;

        Ok(ExplorerPage(html))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerPage(pub String);

impl ExplorerPage {
    pub fn into_http(self) -> http::Response<String> {
        let mut response = http::Response::new(self.0);
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        response
    }
}
