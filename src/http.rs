//! HTTP request and response value types.
//!
//! The proxy never streams bodies: a [`Response`] is always a fully buffered
//! snapshot. The network layer returns independent copies (one for the cache,
//! one for the caller), so there is no single-consumption constraint anywhere
//! in the crate.

use serde::{Deserialize, Serialize};

/// HTTP request method.
///
/// Only `GET` requests are intercepted by the proxy; the full set exists so
/// the dispatcher can recognize and decline everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the request was initiated by the host.
///
/// Navigations get the pre-cached offline page as their last-resort
/// fallback; subresource requests get a generic 503.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestMode {
    /// A page navigation (address bar, link click).
    Navigate,
    /// Any other request (script, style, image, XHR/fetch).
    #[default]
    Subresource,
}

/// An intercepted request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub mode: RequestMode,
}

impl Request {
    /// A plain GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            method: Method::Get,
            url: url.into(),
            mode: RequestMode::Subresource,
        }
    }

    /// A GET request initiated by a page navigation.
    pub fn navigate(url: impl Into<String>) -> Self {
        Request {
            method: Method::Get,
            url: url.into(),
            mode: RequestMode::Navigate,
        }
    }

    /// Build a request with an explicit method (declined by the dispatcher
    /// unless it is GET).
    pub fn with_method(method: Method, url: impl Into<String>) -> Self {
        Request {
            method,
            url: url.into(),
            mode: RequestMode::Subresource,
        }
    }

    /// Whether the URL uses an HTTP(S) scheme or is scheme-relative
    /// (a bare path like `/api/data`).
    ///
    /// Requests with other schemes (`chrome-extension://`, `data:`, ...)
    /// are never intercepted.
    pub fn is_http(&self) -> bool {
        self.url.starts_with("http://")
            || self.url.starts_with("https://")
            || self.url.starts_with('/')
    }

    /// The URL path, without scheme, host, query string, or fragment.
    pub fn path(&self) -> &str {
        let without_scheme = match self.url.find("://") {
            Some(idx) => {
                let rest = &self.url[idx + 3..];
                match rest.find('/') {
                    Some(slash) => &rest[slash..],
                    None => "/",
                }
            }
            None => self.url.as_str(),
        };
        let end = without_scheme
            .find(['?', '#'])
            .unwrap_or(without_scheme.len());
        &without_scheme[..end]
    }

    /// Cache key for this request: method plus full URL.
    ///
    /// The query string is part of the key; `/api/data?page=1` and
    /// `/api/data?page=2` are distinct entries.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// A fully buffered HTTP response snapshot.
///
/// Serde-derived so it can be postcard-encoded for partition storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    /// Header pairs in arrival order. Pass-through responses keep their
    /// headers untouched (`X-Response-Time`, `ETag`, `Cache-Control`, ...).
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Build a response with the default reason phrase for its status.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Response {
            status,
            status_text: reason_phrase(status).to_string(),
            headers: Vec::new(),
            body,
        }
    }

    /// A plain-text response with `Content-Type: text/plain`.
    pub fn text(status: u16, body: &str) -> Self {
        Response::new(status, body.as_bytes().to_vec())
            .with_header("Content-Type", "text/plain; charset=utf-8")
    }

    /// An HTML response with `Content-Type: text/html`.
    pub fn html(status: u16, body: &str) -> Self {
        Response::new(status, body.as_bytes().to_vec())
            .with_header("Content-Type", "text/html; charset=utf-8")
    }

    /// A JSON response serialized from `value`.
    pub fn json<T: Serialize>(status: u16, value: &T) -> crate::error::Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Response::new(status, body).with_header("Content-Type", "application/json"))
    }

    /// Append a header (builder style).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// First header value matching `name`, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the status is a 2xx success.
    ///
    /// Only successful responses are ever persisted to a partition.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body interpreted as UTF-8 (lossy). Convenience for tests and logs.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Default reason phrase for common status codes.
fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_strips_scheme_and_query() {
        let req = Request::get("https://example.com/api/market/data?page=2#top");
        assert_eq!(req.path(), "/api/market/data");
    }

    #[test]
    fn test_request_path_bare() {
        let req = Request::get("/static/app.js");
        assert_eq!(req.path(), "/static/app.js");
    }

    #[test]
    fn test_request_path_host_only() {
        let req = Request::get("https://example.com");
        assert_eq!(req.path(), "/");
    }

    #[test]
    fn test_cache_key_includes_query() {
        let a = Request::get("/api/data?page=1");
        let b = Request::get("/api/data?page=2");
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "GET /api/data?page=1");
    }

    #[test]
    fn test_is_http() {
        assert!(Request::get("https://example.com/x").is_http());
        assert!(Request::get("/relative/path").is_http());
        assert!(!Request::get("chrome-extension://abc/x").is_http());
        assert!(!Request::get("data:text/plain,hi").is_http());
    }

    #[test]
    fn test_response_success_range() {
        assert!(Response::new(200, vec![]).is_success());
        assert!(Response::new(204, vec![]).is_success());
        assert!(!Response::new(304, vec![]).is_success());
        assert!(!Response::new(404, vec![]).is_success());
        assert!(!Response::new(503, vec![]).is_success());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let resp = Response::text(200, "ok").with_header("ETag", "\"abc\"");
        assert_eq!(resp.header("etag"), Some("\"abc\""));
        assert_eq!(resp.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_response_json_body() {
        let resp = Response::json(200, &serde_json::json!({"price": 100}))
            .expect("Failed to build JSON response");
        assert_eq!(resp.body_text(), r#"{"price":100}"#);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_reason_phrase_applied() {
        assert_eq!(Response::new(503, vec![]).status_text, "Service Unavailable");
    }
}
