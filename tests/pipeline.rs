//! Integration tests for resolving configurations against the built-in
//! components.

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;

use httpdebug::config::parse;
use httpdebug::error::{ComponentError, HttpDebugError};
use httpdebug::pipeline::{build_service, Handler};
use httpdebug::{handler, middleware};

fn build(config: &str) -> Result<Handler, HttpDebugError> {
    build_service(&parse(config)?, &middleware::registry(), &handler::registry())
}

async fn get(handler: &Handler, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = handler.call(req).await;
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[test]
fn builtin_names_are_registered() {
    let middlewares: Vec<_> = middleware::registry().names().collect();
    let handlers: Vec<_> = handler::registry().names().collect();

    for name in ["timeout", "req", "log", "json", "header", "header-out"] {
        assert!(middlewares.contains(&name), "missing middleware {name}");
    }
    for name in ["info", "static", "echo", "proxy", "hec", "data", "fs"] {
        assert!(handlers.contains(&name), "missing handler {name}");
    }
}

#[tokio::test]
async fn empty_config_uses_default_pipeline() {
    let handler = build("").unwrap();
    assert_eq!(get(&handler, "/anything").await, (StatusCode::OK, "ok\n".into()));
}

#[test]
fn unknown_middleware_is_named() {
    let err = build("bogus static").unwrap_err();
    assert!(matches!(err, HttpDebugError::MiddlewareNotFound { ref name, .. } if name == "bogus"));
    assert_eq!(err.to_string(), "Path '/': middleware 'bogus' not found");
}

#[test]
fn unknown_handler_is_named() {
    let err = build("/api: log nope").unwrap_err();
    assert!(matches!(
        err,
        HttpDebugError::HandlerNotFound { ref path, ref name } if path == "/api" && name == "nope"
    ));
}

#[test]
fn middleware_name_in_terminal_position_is_not_a_handler() {
    let err = build("log").unwrap_err();
    assert!(matches!(err, HttpDebugError::HandlerNotFound { ref name, .. } if name == "log"));
}

#[test]
fn factory_errors_carry_path_and_component() {
    let err = build("/x: static{code: teapot}").unwrap_err();
    match err {
        HttpDebugError::Component { path, name, source } => {
            assert_eq!(path, "/x");
            assert_eq!(name, "static");
            assert!(matches!(source, ComponentError::InvalidSetting { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = build("proxy").unwrap_err();
    assert!(err.to_string().contains("missing configuration 'target'"));
}

#[tokio::test]
async fn resolving_twice_behaves_the_same() {
    let config = "/a/: header-out{x-a: 1} static{body: A, code: 201} /b: static{body: B}";
    let first = build(config).unwrap();
    let second = build(config).unwrap();

    for uri in ["/a/1", "/b", "/c", "/"] {
        assert_eq!(get(&first, uri).await, get(&second, uri).await, "{uri}");
    }
    assert_eq!(get(&first, "/a/1").await, (StatusCode::CREATED, "A".into()));
    assert_eq!(get(&first, "/c").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn single_root_path_serves_everything() {
    let handler = build("/: static{body: root}").unwrap();
    assert_eq!(get(&handler, "/deep/path").await, (StatusCode::OK, "root".into()));
}
