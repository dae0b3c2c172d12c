//! Resolution of a [`RoutingTable`] into a single request handler.
//!
//! For every path, all steps except the last are looked up in the
//! middleware registry and the last one in the handler registry. Each
//! factory gets the step's settings (empty when none were written) and any
//! error it returns is wrapped with the path and component name. The
//! resolved pieces are composed with [`chain`] and installed into a
//! [`PathDispatcher`], unless the table only covers `/`.

use crate::config::{RoutingTable, Settings, Step, ROOT_PATH};
use crate::error::HttpDebugError;

use super::{chain, Handler, Middleware, PathDispatcher, Registry};

/// Pipeline used for a path that has no steps at all.
#[must_use]
pub fn default_pipeline() -> Vec<Step> {
    vec![Step::new("log"), Step::new("static")]
}

pub fn resolve_path(
    path: &str,
    steps: &[Step],
    middlewares: &Registry<Middleware>,
    handlers: &Registry<Handler>,
) -> Result<Handler, HttpDebugError> {
    let Some((terminal, wrapping)) = steps.split_last() else {
        tracing::debug!(path, "no steps configured, using default pipeline");
        return resolve_path(path, &default_pipeline(), middlewares, handlers);
    };

    let empty = Settings::new();

    let mut resolved = Vec::with_capacity(wrapping.len());
    for step in wrapping {
        let factory =
            middlewares
                .get(&step.name)
                .ok_or_else(|| HttpDebugError::MiddlewareNotFound {
                    path: path.to_string(),
                    name: step.name.clone(),
                })?;
        let middleware = factory(step.settings.as_ref().unwrap_or(&empty))
            .map_err(|source| component_error(path, step, source))?;
        resolved.push(middleware);
    }

    let factory = handlers
        .get(&terminal.name)
        .ok_or_else(|| HttpDebugError::HandlerNotFound {
            path: path.to_string(),
            name: terminal.name.clone(),
        })?;
    let handler = factory(terminal.settings.as_ref().unwrap_or(&empty))
        .map_err(|source| component_error(path, terminal, source))?;

    tracing::debug!(
        path,
        middlewares = resolved.len(),
        handler = %terminal.name,
        "pipeline resolved"
    );

    Ok(chain(resolved, handler))
}

pub fn build_service(
    table: &RoutingTable,
    middlewares: &Registry<Middleware>,
    handlers: &Registry<Handler>,
) -> Result<Handler, HttpDebugError> {
    if table.is_empty() {
        return resolve_path(ROOT_PATH, &[], middlewares, handlers);
    }

    if table.len() == 1 {
        if let Some(steps) = table.get(ROOT_PATH) {
            return resolve_path(ROOT_PATH, steps, middlewares, handlers);
        }
    }

    let mut dispatcher = PathDispatcher::new();
    for (path, steps) in table {
        dispatcher.insert(
            path.clone(),
            resolve_path(path, steps, middlewares, handlers)?,
        );
    }
    Ok(dispatcher.into_handler())
}

fn component_error(
    path: &str,
    step: &Step,
    source: crate::error::ComponentError,
) -> HttpDebugError {
    HttpDebugError::Component {
        path: path.to_string(),
        name: step.name.clone(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::config::parse;
    use crate::error::ComponentError;
    use crate::pipeline::registry::no_config;

    fn stub_middlewares() -> Registry<Middleware> {
        Registry::new()
            .with("log", no_config(Middleware::new(|next| next)))
            .with("deny", no_config(Middleware::from_fn(|_req: Request, _next: Handler| async {
                StatusCode::FORBIDDEN.into_response()
            })))
    }

    fn stub_handlers() -> Registry<Handler> {
        Registry::new().with("static", |settings: &Settings| {
            let code = settings.get("code").map_or("200", String::as_str);
            let status = code
                .parse::<u16>()
                .ok()
                .and_then(|c| StatusCode::from_u16(c).ok())
                .ok_or_else(|| ComponentError::invalid("code", code, "not a status code"))?;
            Ok(Handler::new(move |_req| async move { status.into_response() }))
        })
    }

    fn build(config: &str) -> Result<Handler, HttpDebugError> {
        build_service(&parse(config).unwrap(), &stub_middlewares(), &stub_handlers())
    }

    async fn status(handler: &Handler, path: &str) -> StatusCode {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        handler.call(req).await.status()
    }

    #[tokio::test]
    async fn empty_config_uses_default_pipeline() {
        let handler = build("").unwrap();
        assert_eq!(status(&handler, "/anything").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn root_only_table_serves_every_path() {
        let handler = build("static{code: 202}").unwrap();
        assert_eq!(status(&handler, "/").await, StatusCode::ACCEPTED);
        assert_eq!(status(&handler, "/deep/path").await, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn multiple_paths_are_dispatched() {
        let handler = build("static /admin/: deny static /exact: static{code: 201}").unwrap();
        assert_eq!(status(&handler, "/").await, StatusCode::OK);
        assert_eq!(status(&handler, "/admin/users").await, StatusCode::FORBIDDEN);
        assert_eq!(status(&handler, "/exact").await, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn non_root_single_path_is_dispatched() {
        let handler = build("/api: static").unwrap();
        assert_eq!(status(&handler, "/api").await, StatusCode::OK);
        assert_eq!(status(&handler, "/").await, StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_middleware_is_named() {
        let err = build("bogus static").unwrap_err();
        assert!(matches!(
            err,
            HttpDebugError::MiddlewareNotFound { ref path, ref name } if path == "/" && name == "bogus"
        ));
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
    fn handler_in_middleware_position_is_rejected() {
        let err = build("static static").unwrap_err();
        assert!(matches!(err, HttpDebugError::MiddlewareNotFound { ref name, .. } if name == "static"));
    }

    #[test]
    fn middleware_as_terminal_is_rejected() {
        let err = build("log").unwrap_err();
        assert!(matches!(err, HttpDebugError::HandlerNotFound { ref name, .. } if name == "log"));
    }

    #[test]
    fn factory_error_is_wrapped() {
        let err = build("/x: static{code: teapot}").unwrap_err();
        match err {
            HttpDebugError::Component { path, name, source } => {
                assert_eq!(path, "/x");
                assert_eq!(name, "static");
                assert!(matches!(source, ComponentError::InvalidSetting { ref key, .. } if key == "code"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_step_list_falls_back_to_default() {
        let handler = resolve_path("/", &[], &stub_middlewares(), &stub_handlers()).unwrap();
        assert_eq!(status(&handler, "/").await, StatusCode::OK);
    }
}
