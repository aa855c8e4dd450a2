//! Request handlers sitting between a web server and an external GraphQL query engine.
//!
//! This crate owns none of the GraphQL machinery. It extracts the method and payload from an
//! HTTP request, hands them to a [QueryEngine], and shapes whatever comes back into an HTTP
//! response. The same goes for the interactive explorer page with an [ExplorerRenderer].
//!
//! Everything here speaks the `http` crate vocabulary so any host framework can drive it. See
//! `graphql-adapter-axum` for the axum integration.

mod error;
mod explorer;
mod options;
mod query;
mod query_string;

pub use error::{BuildError, HttpQueryError, QueryError};
pub use explorer::{
    graphiql::{GraphiqlOptions, GraphiqlRenderer},
    ExplorerHandler, ExplorerPage, ExplorerRenderer, ExplorerRequest,
};
pub use options::Options;
pub use query::{HttpQueryRequest, QueryEngine, QueryHandler, QueryHandlerBuilder, QueryResponse, ResponseBody};

/// Any failure the adapter doesn't know how to shape. Those are left to the host framework.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
