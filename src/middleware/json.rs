//! `json`: pretty-print JSON request bodies to stdout.
//!
//! Only bodies with a declared `Content-Length` between 1 byte and
//! [`MAX_BODY`] are buffered; chunked or larger bodies pass through
//! untouched. The buffered bytes are handed on unchanged either way.

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::inspect::{content_length, pretty_json};
use crate::pipeline::{Handler, Middleware};

pub const MAX_BODY: u64 = 1_000_000;

#[must_use]
pub fn middleware() -> Middleware {
    Middleware::from_fn(|req: Request, next: Handler| async move {
        if !matches!(content_length(req.headers()), Some(1..=MAX_BODY)) {
            return next.call(req).await;
        }

        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_BODY as usize).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request body");
                return (StatusCode::BAD_REQUEST, "failed to read body\n").into_response();
            }
        };

        match pretty_json(&bytes) {
            Ok(pretty) => println!("{pretty}"),
            Err(e) => tracing::warn!(error = %e, "could not print json"),
        }

        next.call(Request::from_parts(parts, Body::from(bytes))).await
    })
}
