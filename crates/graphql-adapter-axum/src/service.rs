use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{extract::Request, response::Response};
use futures_util::future::BoxFuture;
use graphql_adapter::{BoxError, ExplorerHandler, ExplorerRenderer, QueryEngine, QueryHandler};

use crate::into_axum_response;

// Same as axum's DefaultBodyLimit.
const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Serves GraphQL requests with a [QueryHandler].
///
/// Protocol errors are written into the response. Anything else, including a body that can't
/// be read, is the service error and belongs to the host's error handling.
pub struct GraphqlService<E: QueryEngine> {
    handler: Arc<QueryHandler<E>>,
    body_limit: usize,
}

impl<E: QueryEngine> Clone for GraphqlService<E> {
    fn clone(&self) -> Self {
        GraphqlService {
            handler: Arc::clone(&self.handler),
            body_limit: self.body_limit,
        }
    }
}

impl<E: QueryEngine> GraphqlService<E> {
    pub fn new(handler: QueryHandler<E>) -> Self {
        GraphqlService {
            handler: Arc::new(handler),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl<E: QueryEngine> tower::Service<Request> for GraphqlService<E> {
    type Response = Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Response, BoxError>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let body_limit = self.body_limit;

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, body_limit).await?;

            let response = handler.execute(&parts, &body).await?;

            Ok(into_axum_response(response.into_http()))
        })
    }
}

/// Serves the explorer page with an [ExplorerHandler]. Every failure is the service error.
pub struct ExplorerService<R: ExplorerRenderer> {
    handler: Arc<ExplorerHandler<R>>,
}

impl<R: ExplorerRenderer> Clone for ExplorerService<R> {
    fn clone(&self) -> Self {
        ExplorerService {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<R: ExplorerRenderer> ExplorerService<R> {
    pub fn new(handler: ExplorerHandler<R>) -> Self {
        ExplorerService {
            handler: Arc::new(handler),
        }
    }
}

impl<R: ExplorerRenderer> tower::Service<Request> for ExplorerService<R> {
    type Response = Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Response, BoxError>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let handler = Arc::clone(&self.handler);

        Box::pin(async move {
            let (parts, _) = request.into_parts();
            let page = handler.render(&parts).await?;

            Ok(into_axum_response(page.into_http()))
        })
    }
}
