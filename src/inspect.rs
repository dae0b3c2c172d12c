//! Helpers for looking inside requests.
//!
//! Shared by the built-in middlewares and handlers: query lookup, client
//! address, a textual dump of the request head, and JSON pretty-printing.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{HeaderMap, Uri};

/// First value of `key` in the query string, percent-decoded.
#[must_use]
pub fn query_param(uri: &Uri, key: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Peer address recorded by `into_make_service_with_connect_info`.
#[must_use]
pub fn remote_addr(req: &Request) -> Option<SocketAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

#[must_use]
pub fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Request line followed by one `Name: value` line per header.
#[must_use]
pub fn dump_head(req: &Request) -> String {
    let target = req
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());
    let mut out = format!("{} {} {:?}\r\n", req.method(), target, req.version());
    for (name, value) in req.headers() {
        // write! to String is infallible
        let _ = write!(
            out,
            "{}: {}\r\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out
}

/// Headers grouped by name, values in arrival order.
#[must_use]
pub fn header_lists(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut lists: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        lists
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    lists
}

/// Re-indent a JSON document with two spaces.
pub fn pretty_json(raw: &[u8]) -> Result<String, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(raw)?;
    serde_json::to_string_pretty(&value)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Method;

    use super::*;

    #[test]
    fn query_param_is_decoded() {
        let uri: Uri = "/data?size=12&duration=1%20s".parse().unwrap();
        assert_eq!(query_param(&uri, "size").as_deref(), Some("12"));
        assert_eq!(query_param(&uri, "duration").as_deref(), Some("1 s"));
        assert_eq!(query_param(&uri, "missing"), None);
        assert_eq!(query_param(&"/plain".parse().unwrap(), "size"), None);
    }

    #[test]
    fn dump_contains_request_line_and_headers() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/submit?x=1")
            .header("x-test", "yes")
            .body(Body::empty())
            .unwrap();

        let dump = dump_head(&req);

        assert!(dump.starts_with("POST /submit?x=1 HTTP/1.1\r\n"));
        assert!(dump.contains("x-test: yes\r\n"));
    }

    #[test]
    fn header_lists_keep_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("accept", "a".parse().unwrap());
        headers.append("accept", "b".parse().unwrap());

        let lists = header_lists(&headers);
        assert_eq!(lists["accept"], ["a", "b"]);
    }

    #[test]
    fn content_length_parses() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers), None);
        headers.insert(CONTENT_LENGTH, "42".parse().unwrap());
        assert_eq!(content_length(&headers), Some(42));
    }

    #[test]
    fn pretty_json_reindents() {
        assert_eq!(pretty_json(br#"{"a":[1]}"#).unwrap(), "{\n  \"a\": [\n    1\n  ]\n}");
        assert!(pretty_json(b"not json").is_err());
    }
}
