//! `timeout`: delay a request by the `duration` query parameter.
//!
//! Durations are read with `humantime` (`300ms`, `1m30s`, `2h 5min`), plus
//! a single fractional term such as `1.5s`. A leading `-` is accepted and
//! means no delay. A request without the parameter passes straight through.

use std::time::Duration;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::inspect::query_param;
use crate::pipeline::{Handler, Middleware};

#[derive(Debug, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("invalid duration '{0}'")]
    Malformed(String),
}

#[must_use]
pub fn middleware() -> Middleware {
    Middleware::from_fn(|req: Request, next: Handler| async move {
        if let Some(raw) = query_param(req.uri(), "duration") {
            match parse_duration(&raw) {
                Ok(delay) => {
                    tracing::debug!(delay = ?delay, "delaying request");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return (StatusCode::BAD_REQUEST, format!("{e}\n")).into_response(),
            }
        }
        next.call(req).await
    })
}

pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    if let Some(magnitude) = input.strip_prefix('-') {
        return parse_magnitude(magnitude, input).map(|_| Duration::ZERO);
    }
    parse_magnitude(input.strip_prefix('+').unwrap_or(input), input)
}

fn parse_magnitude(text: &str, input: &str) -> Result<Duration, DurationError> {
    let malformed = || DurationError::Malformed(input.to_string());
    let read = |text: &str| {
        let text = text.replace(['µ', 'μ'], "u");
        humantime::parse_duration(&text).map_err(|source| DurationError::Invalid {
            input: input.to_string(),
            source,
        })
    };

    if text == "0" {
        return Ok(Duration::ZERO);
    }
    let Some((whole, fraction)) = text.split_once('.') else {
        return read(text);
    };

    let digits = fraction
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(fraction.len());
    let (fraction, unit) = fraction.split_at(digits);
    if (whole.is_empty() && fraction.is_empty())
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || unit.is_empty()
        || !unit.chars().all(char::is_alphabetic)
    {
        return Err(malformed());
    }

    let value: f64 = format!("{whole}.{fraction}")
        .parse()
        .map_err(|_| malformed())?;
    let unit = read(&format!("1{unit}"))?;
    Duration::try_from_secs_f64(unit.as_secs_f64() * value).map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;
    use crate::pipeline::chain;

    #[test]
    fn parses_units() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_duration("+5ms").unwrap(), Duration::from_millis(5));
        assert_eq!(parse_duration("2h 5min").unwrap(), Duration::from_secs(7500));
        assert_eq!(parse_duration("3µs").unwrap(), Duration::from_micros(3));
    }

    #[test]
    fn negative_durations_mean_no_delay() {
        assert_eq!(parse_duration("-1s").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-1.5h").unwrap(), Duration::ZERO);
        assert!(parse_duration("-soon").is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(parse_duration("12").unwrap_err(), DurationError::Invalid { .. }));
        assert!(matches!(parse_duration("3x").unwrap_err(), DurationError::Invalid { .. }));
        assert!(matches!(parse_duration("").unwrap_err(), DurationError::Invalid { .. }));
        assert!(matches!(parse_duration("s").unwrap_err(), DurationError::Invalid { .. }));
        assert!(matches!(parse_duration("1.2.3s").unwrap_err(), DurationError::Malformed(_)));
        assert!(matches!(parse_duration("1.5h30m").unwrap_err(), DurationError::Malformed(_)));
        assert!(matches!(parse_duration("1.5").unwrap_err(), DurationError::Malformed(_)));
    }

    fn ok_handler() -> Handler {
        Handler::new(|_req| async { StatusCode::OK.into_response() })
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_requested_duration() {
        let handler = chain(vec![middleware()], ok_handler());
        let req = Request::builder()
            .uri("/?duration=3s")
            .body(Body::empty())
            .unwrap();

        let start = tokio::time::Instant::now();
        let resp = handler.call(req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn negative_duration_forwards_immediately() {
        let handler = chain(vec![middleware()], ok_handler());
        let req = Request::builder()
            .uri("/?duration=-1s")
            .body(Body::empty())
            .unwrap();

        let start = tokio::time::Instant::now();
        let resp = handler.call(req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test]
    async fn bad_duration_is_rejected() {
        let handler = chain(vec![middleware()], ok_handler());
        let req = Request::builder()
            .uri("/?duration=soon")
            .body(Body::empty())
            .unwrap();

        let resp = handler.call(req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
