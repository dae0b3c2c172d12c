//! Path-based dispatch between per-path pipelines.
//!
//! [`PathDispatcher`] scores each registered pattern against the request
//! path: a pattern ending in `/` matches every path it prefixes, any other
//! pattern matches only itself. The longest matching pattern wins, so `/`
//! acts as the catch-all and `/api/v1/` beats `/api/`.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::Handler;

#[derive(Debug, Default)]
pub struct PathDispatcher {
    routes: Vec<(String, Handler)>,
}

impl PathDispatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Install `handler` for `pattern`, replacing an earlier entry for the
    /// same pattern.
    pub fn insert(&mut self, pattern: impl Into<String>, handler: Handler) {
        let pattern = pattern.into();
        if let Some(entry) = self.routes.iter_mut().find(|(p, _)| *p == pattern) {
            entry.1 = handler;
        } else {
            self.routes.push((pattern, handler));
        }
    }

    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Handler> {
        let mut best_match: Option<&Handler> = None;
        let mut best_specificity = 0;

        for (pattern, handler) in &self.routes {
            if !pattern_matches(pattern, path) {
                continue;
            }
            let specificity = pattern.len();
            if best_match.is_none() || specificity > best_specificity {
                best_match = Some(handler);
                best_specificity = specificity;
            }
        }

        best_match
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Turn the dispatcher into a single handler. Unmatched paths get `404`.
    #[must_use]
    pub fn into_handler(self) -> Handler {
        let dispatcher = Arc::new(self);
        Handler::new(move |req: Request| {
            let matched = dispatcher.lookup(req.uri().path()).cloned();
            async move {
                match matched {
                    Some(handler) => handler.call(req).await,
                    None => {
                        tracing::warn!(
                            method = %req.method(),
                            path = %req.uri().path(),
                            "no pipeline matched"
                        );
                        StatusCode::NOT_FOUND.into_response()
                    }
                }
            }
        })
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        path.starts_with(pattern)
    } else {
        path == pattern
    }
}
