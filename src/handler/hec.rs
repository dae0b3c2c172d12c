//! `hec`: HTTP Event Collector sink.
//!
//! Treats the body as newline-delimited JSON events and prints each one
//! pretty-printed to stdout. Lines that are not JSON are logged and
//! skipped; the response is always an empty `200`.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::inspect::pretty_json;
use crate::pipeline::Handler;

#[must_use]
pub fn handler() -> Handler {
    Handler::new(|req: Request| async move {
        let body = match axum::body::to_bytes(req.into_body(), usize::MAX).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read event stream");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };

        for event in pretty_events(&body) {
            println!("{event}");
        }
        StatusCode::OK.into_response()
    })
}

/// Pretty-printed form of every valid JSON line in `body`.
pub fn pretty_events(body: &[u8]) -> Vec<String> {
    body.split(|b| *b == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match pretty_json(line) {
            Ok(pretty) => Some(pretty),
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse event");
                None
            }
        })
        .collect()
}
