//! axum integration of [graphql_adapter].
//!
//! [GraphqlService] and [ExplorerService] are plain tower services whose error is the failure
//! the adapter couldn't shape. They're meant to be wrapped in a
//! [HandleError](axum::error_handling::HandleError) with the host's own error handling.
//! [graphql_route] and [explorer_route] do so with [internal_server_error].

mod service;

use axum::{
    error_handling::HandleError,
    response::{IntoResponse, Response},
    routing::{any_service, get_service, MethodRouter},
};
use graphql_adapter::{BoxError, ExplorerHandler, ExplorerRenderer, QueryEngine, QueryHandler};
use http::StatusCode;

pub use service::{ExplorerService, GraphqlService};

pub fn into_axum_response(response: http::Response<String>) -> Response {
    response.map(axum::body::Body::from)
}

/// Default error handling: log and answer with a bare 500.
pub async fn internal_server_error(error: BoxError) -> Response {
    tracing::error!("GraphQL handler failed: {error}");

    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// GraphQL endpoint accepting any method, the query engine decides which ones it supports.
pub fn graphql_route<E: QueryEngine>(handler: QueryHandler<E>) -> MethodRouter {
    any_service(HandleError::<_, _, ()>::new(
        GraphqlService::new(handler),
        internal_server_error,
    ))
}

pub fn explorer_route<R: ExplorerRenderer>(handler: ExplorerHandler<R>) -> MethodRouter {
    get_service(HandleError::<_, _, ()>::new(
        ExplorerService::new(handler),
        internal_server_error,
    ))
}
