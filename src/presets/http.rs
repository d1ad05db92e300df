//! Rendering of `http` requests and responses

use crate::core::{format_by_type, Attr, Formatter, Value};
use ::http::header::{CONTENT_LENGTH, HOST};
use ::http::{HeaderMap, Request, Response};
use std::any::Any;

/// Value written in place of headers when they are ignored
pub const HIDDEN_HEADERS: &str = "[hidden]";

/// Pairs in first-seen key order, repeated keys joined with `,`
fn joined(pairs: impl Iterator<Item = (String, String)>) -> Vec<Attr> {
    let mut merged: Vec<(String, String)> = Vec::new();
    for (key, value) in pairs {
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => merged.push((key, value)),
        }
    }
    merged
        .into_iter()
        .map(|(key, value)| Attr::new(key, value))
        .collect()
}

fn headers_attr(headers: &HeaderMap, ignore: bool) -> Attr {
    if ignore {
        return Attr::new("headers", HIDDEN_HEADERS);
    }
    let pairs = headers.iter().map(|(name, value)| {
        (
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )
    });
    Attr::group("headers", joined(pairs))
}

/// Raw query pairs; values are not percent-decoded
fn query_attrs(query: &str) -> Vec<Attr> {
    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        });
    joined(pairs)
}

/// Expand every `http::Request<B>` payload into a readable group
///
/// The group holds `host`, `method`, `url`, a `url` sub-group (scheme, host,
/// path, raw query and parsed query) and the headers, or `"[hidden]"` when
/// `ignore_headers` is set.
///
/// ```
/// use rust_log_formatter::prelude::*;
///
/// let request = http::Request::get("https://example.com/a?b=1").body(()).unwrap();
/// let rule = http_request_formatter::<()>(true);
///
/// let rendered = rule.apply(&[], &Attr::any("req", request)).unwrap().unwrap();
/// assert_eq!(rendered.group_attrs()[1], Attr::new("method", "GET"));
/// ```
pub fn http_request_formatter<B: Any>(ignore_headers: bool) -> Formatter {
    format_by_type::<Request<B>, _>(move |req| {
        let uri = req.uri();
        let host = req
            .headers()
            .get(HOST)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .or_else(|| uri.authority().map(|authority| authority.to_string()))
            .unwrap_or_default();
        let url = uri.to_string();
        let query = uri.query().unwrap_or_default();

        Value::group(vec![
            Attr::new("host", host),
            Attr::new("method", req.method().as_str()),
            Attr::new("url", url.as_str()),
            Attr::group(
                "url",
                vec![
                    Attr::new("url", url.as_str()),
                    Attr::new("scheme", uri.scheme_str().unwrap_or_default()),
                    Attr::new("host", uri.host().unwrap_or_default()),
                    Attr::new("path", uri.path()),
                    Attr::new("raw_query", query),
                    Attr::group("query", query_attrs(query)),
                ],
            ),
            headers_attr(req.headers(), ignore_headers),
        ])
    })
}

/// Expand every `http::Response<B>` payload into a readable group
///
/// `content_length` is `-1` when the header is missing or not a number.
pub fn http_response_formatter<B: Any>(ignore_headers: bool) -> Formatter {
    format_by_type::<Response<B>, _>(move |res| {
        let status = res.status();
        let status_text = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };
        let content_length = res
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(-1);

        Value::group(vec![
            Attr::new("status", i64::from(status.as_u16())),
            Attr::new("status_text", status_text),
            Attr::new("content_length", content_length),
            headers_attr(res.headers(), ignore_headers),
        ])
    })
}
