use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::{
    body::Body,
    error_handling::HandleError,
    extract::Request,
    http::{self, header, request::Parts, HeaderName, HeaderValue, Method, StatusCode},
    response::Response,
    Router,
};
use graphql_adapter::{BoxError, HttpQueryError, HttpQueryRequest, QueryEngine, QueryError, QueryHandler};
use graphql_adapter_axum::{graphql_route, GraphqlService};
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Clone)]
enum Outcome {
    Success(&'static str),
    Http(HttpQueryError),
    Opaque(&'static str),
}

#[derive(Clone)]
struct Engine {
    outcome: Outcome,
    received: Arc<Mutex<Vec<(Method, Value)>>>,
}

impl QueryEngine for Engine {
    type Options = ();

    async fn run_http_query(&self, _: &Parts, request: HttpQueryRequest<()>) -> Result<String, QueryError> {
        self.received.lock().unwrap().push((request.method, request.query));

        match self.outcome.clone() {
            Outcome::Success(payload) => Ok(payload.to_string()),
            Outcome::Http(error) => Err(error.into()),
            Outcome::Opaque(message) => Err(QueryError::opaque(message)),
        }
    }
}

fn engine(outcome: Outcome) -> Engine {
    Engine {
        outcome,
        received: Default::default(),
    }
}

fn handler(engine: Engine) -> QueryHandler<Engine> {
    QueryHandler::builder(engine).options(()).build().unwrap()
}

fn post(body: &'static str) -> Request {
    http::Request::post("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request {
    http::Request::get(uri).body(Body::empty()).unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn post_request() {
    let engine = engine(Outcome::Success(r#"{"data":{"x":1}}"#));
    let app = Router::new().route("/graphql", graphql_route(handler(engine.clone())));

    let response = app.oneshot(post(r#"{"query":"{x}"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_string(response).await, r#"{"data":{"x":1}}"#);

    let received = engine.received.lock().unwrap();
    assert_eq!(*received, vec![(Method::POST, json!({ "query": "{x}" }))]);
}

#[tokio::test]
async fn get_request() {
    let engine = engine(Outcome::Success(r#"{"data":{"x":1}}"#));
    let app = Router::new().route("/graphql", graphql_route(handler(engine.clone())));

    let response = app.oneshot(get("/graphql?query=%7Bx%7D")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"data":{"x":1}}"#);

    let received = engine.received.lock().unwrap();
    assert_eq!(*received, vec![(Method::GET, json!({ "query": "{x}" }))]);
}

#[tokio::test]
async fn protocol_error() {
    let error = HttpQueryError::new(
        StatusCode::BAD_REQUEST,
        r#"{"errors":[{"message":"Cannot query field \"y\" on type \"Query\"."}],"data":{"x":1}}"#,
    )
    .with_header(HeaderName::from_static("x-foo"), HeaderValue::from_static("bar"));
    let app = Router::new().route("/graphql", graphql_route(handler(engine(Outcome::Http(error)))));

    let response = app.oneshot(post(r#"{"query":"{x y}"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-foo"], "bar");

    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();

    insta::assert_json_snapshot!(body, @r#"
    {
      "errors": [
        {
          "message": "Cannot query field \"y\" on type \"Query\"."
        }
      ],
      "data": null
    }
    "#);
}

#[tokio::test]
async fn plain_text_protocol_error() {
    let error = HttpQueryError::new(StatusCode::METHOD_NOT_ALLOWED, "oops");
    let app = Router::new().route("/graphql", graphql_route(handler(engine(Outcome::Http(error)))));

    let response = app
        .oneshot(http::Request::delete("/graphql").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_string(response).await, "oops");
}

#[tokio::test]
async fn opaque_error_is_the_service_error() {
    let service = GraphqlService::new(handler(engine(Outcome::Opaque("engine crashed"))));

    let error = service.oneshot(get("/graphql?query={x}")).await.unwrap_err();

    assert_eq!(error.to_string(), "engine crashed");
}

#[tokio::test]
async fn opaque_error_reaches_the_host_error_handling_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let on_error = {
        let calls = calls.clone();
        move |error: BoxError| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { (StatusCode::BAD_GATEWAY, format!("host: {error}")) }
        }
    };

    let service = GraphqlService::new(handler(engine(Outcome::Opaque("engine crashed"))));
    let app = Router::new().route_service("/graphql", HandleError::<_, _, ()>::new(service, on_error));

    let response = app.oneshot(get("/graphql?query={x}")).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_string(response).await, "host: engine crashed");
}

#[tokio::test]
async fn default_error_handling() {
    let app = Router::new().route(
        "/graphql",
        graphql_route(handler(engine(Outcome::Opaque("engine crashed")))),
    );

    let response = app.oneshot(get("/graphql?query={x}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal Server Error");
}

#[tokio::test]
async fn body_over_the_limit() {
    let engine = engine(Outcome::Success("{}"));
    let service = GraphqlService::new(handler(engine.clone())).with_body_limit(8);

    let result = service.oneshot(post(r#"{"query":"{ a b c d e f }"}"#)).await;

    assert!(result.is_err());
    assert!(engine.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_json_body() {
    let engine = engine(Outcome::Success("{}"));
    let app = Router::new().route("/graphql", graphql_route(handler(engine.clone())));

    let response = app.oneshot(post("{")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.starts_with("POST body is not valid JSON"));
    assert!(engine.received.lock().unwrap().is_empty());
}
