//! Header rewriting for proxied requests and responses.
//!
//! [`build_forwarded_headers`] clones the client headers, strips
//! hop-by-hop headers, points `Host` at the upstream and records the
//! client in `X-Forwarded-For` / `X-Forwarded-Host`. [`upgrade_protocol`]
//! and [`keep_upgrade`] carry a protocol switch across the hop.

use std::sync::LazyLock;

use axum::http::header::{CONNECTION, HOST, UPGRADE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

static X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
static X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "proxy-connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all("connection")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| name.trim().parse::<HeaderName>().ok())
        .collect();

    for name in HOP_BY_HOP.iter().chain(&listed) {
        headers.remove(name);
    }
}

/// The `Upgrade` value of a request whose `Connection` asks for an upgrade.
#[must_use]
pub fn upgrade_protocol(headers: &HeaderMap) -> Option<HeaderValue> {
    let requested = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
    requested.then(|| headers.get(UPGRADE).cloned()).flatten()
}

/// Put back the upgrade request that hop-by-hop stripping removed.
pub fn keep_upgrade(headers: &mut HeaderMap, protocol: HeaderValue) {
    headers.insert(CONNECTION, HeaderValue::from_static("upgrade"));
    headers.insert(UPGRADE, protocol);
}

/// `host[:port]` of `url`, with the port only when it is not the default.
#[must_use]
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    url.port()
        .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"))
}

pub fn build_forwarded_headers(
    original: &HeaderMap,
    client_ip: Option<&str>,
    target: &Url,
) -> HeaderMap {
    let mut headers = original.clone();
    strip_hop_by_hop(&mut headers);

    if let Ok(val) = HeaderValue::from_str(&authority(target)) {
        headers.insert(HOST, val);
    }

    if let Some(client_ip) = client_ip {
        let chain = original
            .get_all(&X_FORWARDED_FOR)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        let xff = if chain.is_empty() {
            client_ip.to_string()
        } else {
            format!("{chain}, {client_ip}")
        };
        if let Ok(val) = HeaderValue::from_str(&xff) {
            headers.insert(X_FORWARDED_FOR.clone(), val);
        }
    }

    if let Some(original_host) = original.get(HOST) {
        if !headers.contains_key(&X_FORWARDED_HOST) {
            headers.insert(X_FORWARDED_HOST.clone(), original_host.clone());
        }
    }

    headers
}
