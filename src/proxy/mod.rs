//! `proxy`: single-upstream reverse proxy handler.
//!
//! Every request is forwarded to the configured `target`. The target's
//! path is joined with the request path and the two queries are merged.
//! Request bodies are buffered before sending; upstream response bodies
//! are streamed back untouched. Header rewriting lives in [`headers`].
//!
//! An HTTP/1.1 request carrying `Connection: upgrade` keeps its `Upgrade`
//! header. When the upstream answers `101`, both upgraded connections are
//! joined and bytes are copied between them until either side closes.

pub mod headers;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{StatusCode, Uri, Version};
use axum::response::{IntoResponse, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::upgrade::OnUpgrade;
use hyper_util::rt::TokioIo;
use url::Url;

use crate::config::Settings;
use crate::error::ComponentError;
use crate::inspect::remote_addr;
use crate::pipeline::Handler;
use crate::server::{build_http_client, HttpClient};

use self::headers::{build_forwarded_headers, keep_upgrade, strip_hop_by_hop, upgrade_protocol};

struct Upstream {
    client: HttpClient,
    target: Url,
}

pub fn factory(settings: &Settings) -> Result<Handler, ComponentError> {
    let raw = settings
        .get("target")
        .ok_or(ComponentError::MissingSetting { key: "target" })?;
    let target = Url::parse(raw).map_err(|e| ComponentError::invalid("target", raw, e))?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(ComponentError::invalid(
            "target",
            raw,
            "scheme must be http or https",
        ));
    }

    let upstream = Arc::new(Upstream {
        client: build_http_client(),
        target,
    });

    Ok(Handler::new(move |req: Request| {
        let upstream = Arc::clone(&upstream);
        async move { upstream.forward(req).await }
    }))
}

impl Upstream {
    async fn forward(&self, mut req: Request) -> Response {
        let uri = match target_uri(&self.target, req.uri()) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(target = %self.target, error = %e, "failed to build upstream URI");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };

        let client_ip = remote_addr(&req).map(|addr| addr.ip().to_string());
        let upgrade = (req.version() == Version::HTTP_11)
            .then(|| upgrade_protocol(req.headers()))
            .flatten();
        let client_upgrade = upgrade.is_some().then(|| hyper::upgrade::on(&mut req));
        let (parts, body) = req.into_parts();
        let body = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request body");
                return StatusCode::BAD_REQUEST.into_response();
            }
        };

        let mut builder = hyper::Request::builder()
            .method(parts.method)
            .uri(uri.clone());
        if let Some(headers) = builder.headers_mut() {
            *headers = build_forwarded_headers(&parts.headers, client_ip.as_deref(), &self.target);
            if let Some(protocol) = upgrade {
                keep_upgrade(headers, protocol);
            }
        }
        let upstream_req = match builder.body(Full::new(body)) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(uri = %uri, error = %e, "failed to build upstream request");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };

        match self.client.request(upstream_req).await {
            Ok(resp) if resp.status() == StatusCode::SWITCHING_PROTOCOLS => match client_upgrade {
                Some(client_upgrade) => switch_protocols(client_upgrade, resp, uri),
                None => {
                    tracing::error!(uri = %uri, "upstream switched protocols unasked");
                    StatusCode::BAD_GATEWAY.into_response()
                }
            },
            Ok(resp) => {
                let (mut parts, body) = resp.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(uri = %uri, error = %e, "upstream request failed");
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }
}

/// Answer the client with the upstream's `101` and tunnel both upgraded
/// connections in the background.
fn switch_protocols(client: OnUpgrade, mut resp: hyper::Response<Incoming>, uri: Uri) -> Response {
    let upstream = hyper::upgrade::on(&mut resp);

    tokio::spawn(async move {
        let (client, upstream) = match tokio::try_join!(client, upstream) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(uri = %uri, error = %e, "connection upgrade failed");
                return;
            }
        };
        let (mut client, mut upstream) = (TokioIo::new(client), TokioIo::new(upstream));
        match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
            Ok((sent, received)) => {
                tracing::debug!(uri = %uri, sent, received, "upgraded connection closed");
            }
            Err(e) => tracing::warn!(uri = %uri, error = %e, "upgraded connection failed"),
        }
    });

    let (parts, _) = resp.into_parts();
    Response::from_parts(parts, Body::empty())
}

/// Upstream URI for a request: target path joined to request path with a
/// single slash, target query first.
pub fn target_uri(target: &Url, request: &Uri) -> Result<Uri, axum::http::uri::InvalidUri> {
    let path = join_paths(target.path(), request.path());
    let query = match (target.query().filter(|q| !q.is_empty()), request.query()) {
        (Some(t), Some(r)) if !r.is_empty() => Some(format!("{t}&{r}")),
        (Some(t), _) => Some(t.to_string()),
        (None, r) => r.filter(|r| !r.is_empty()).map(str::to_string),
    };

    let mut uri = format!("{}://{}{path}", target.scheme(), headers::authority(target));
    if let Some(query) = query {
        uri.push('?');
        uri.push_str(&query);
    }
    uri.parse()
}

#[must_use]
pub fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_slash() {
        assert_eq!(join_paths("/", "/api"), "/api");
        assert_eq!(join_paths("/base", "/api"), "/base/api");
        assert_eq!(join_paths("/base/", "/api"), "/base/api");
        assert_eq!(join_paths("/base", "api"), "/base/api");
    }

    #[test]
    fn merges_queries() {
        let target = Url::parse("http://backend:9000/v1?key=abc").unwrap();

        let uri = target_uri(&target, &"/items?page=2".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "http://backend:9000/v1/items?key=abc&page=2");

        let uri = target_uri(&target, &"/items".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "http://backend:9000/v1/items?key=abc");
    }

    #[test]
    fn request_query_alone() {
        let target = Url::parse("https://example.com").unwrap();
        let uri = target_uri(&target, &"/search?q=rust".parse().unwrap()).unwrap();
        assert_eq!(uri.to_string(), "https://example.com/search?q=rust");
    }

    #[test]
    fn target_is_required_and_validated() {
        let err = factory(&Settings::new()).unwrap_err();
        assert!(matches!(err, ComponentError::MissingSetting { key: "target" }));

        let settings = Settings::from([("target".to_string(), "ftp://files".to_string())]);
        assert!(matches!(
            factory(&settings).unwrap_err(),
            ComponentError::InvalidSetting { key, .. } if key == "target"
        ));

        let settings = Settings::from([("target".to_string(), "not a url".to_string())]);
        assert!(factory(&settings).is_err());
    }
}
