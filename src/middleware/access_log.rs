//! `log`: one access log line per request. The line is emitted once the
//! response body has been sent (or dropped), with the bytes actually
//! written.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, Uri, Version};
use axum::response::Response;
use bytes::Bytes;
use hyper::body::{Body as _, Frame, SizeHint};

use crate::inspect::remote_addr;
use crate::pipeline::{Handler, Middleware};

struct AccessEntry {
    src: String,
    method: Method,
    proto: Version,
    url: Uri,
    code: u16,
    start: Instant,
}

/// Response body that counts data bytes as they are polled and logs the
/// access line when dropped.
pub struct AccessLogBody {
    inner: Body,
    entry: AccessEntry,
    written: u64,
}

impl hyper::body::Body for AccessLogBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let poll = Pin::new(&mut self.inner).poll_frame(cx);
        if let Poll::Ready(Some(Ok(frame))) = &poll {
            if let Some(data) = frame.data_ref() {
                self.written += data.len() as u64;
            }
        }
        poll
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for AccessLogBody {
    fn drop(&mut self) {
        let entry = &self.entry;
        tracing::info!(
            src = %entry.src,
            method = %entry.method,
            proto = ?entry.proto,
            url = %entry.url,
            code = entry.code,
            dt = ?entry.start.elapsed(),
            written = self.written,
            "request served"
        );
    }
}

#[must_use]
pub fn middleware() -> Middleware {
    Middleware::from_fn(|req: Request, next: Handler| async move {
        let start = Instant::now();
        let src = remote_addr(&req).map_or_else(|| "-".to_string(), |addr| addr.to_string());
        let method = req.method().clone();
        let proto = req.version();
        let url = req.uri().clone();

        let (parts, body) = next.call(req).await.into_parts();
        let entry = AccessEntry {
            src,
            method,
            proto,
            url,
            code: parts.status.as_u16(),
            start,
        };
        Response::from_parts(
            parts,
            Body::new(AccessLogBody {
                inner: body,
                entry,
                written: 0,
            }),
        )
    })
}
