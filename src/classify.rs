//! Request classification.
//!
//! A pure, deterministic function from a request's URL path to one of four
//! resource classes. The class determines both which partition stores the
//! entry and which fetch strategy resolves the request.
//!
//! Rules, in precedence order:
//!
//! 1. Path prefix `/static/` or extension css/js/png/jpg/svg → [`ResourceClass::Static`]
//! 2. Path prefix `/api/` → [`ResourceClass::Api`]
//! 3. Extension jpg/jpeg/png/gif/svg/webp → [`ResourceClass::Image`]
//! 4. Everything else → [`ResourceClass::Dynamic`] (fail-open to network-first)
//!
//! Prefix rules win over extension rules, so `/api/chart.png` is `Api` and
//! `/static/logo.webp` is `Static`.

use crate::config::ProxyConfig;
use crate::http::Request;
use crate::strategy::FetchStrategy;

/// Extensions that mark a resource as a static asset.
const STATIC_EXTENSIONS: [&str; 5] = ["css", "js", "png", "jpg", "svg"];

/// Extensions that mark a resource as an image.
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// Resource class assigned to an intercepted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    /// App-shell asset (`/static/` prefix or a static extension).
    Static,
    /// Backend API call (`/api/` prefix).
    Api,
    /// Image outside the static tree.
    Image,
    /// Anything else; the default class.
    Dynamic,
}

impl ResourceClass {
    /// The fetch strategy for this class.
    pub fn strategy(&self) -> FetchStrategy {
        match self {
            ResourceClass::Static | ResourceClass::Image => FetchStrategy::CacheFirst,
            ResourceClass::Api | ResourceClass::Dynamic => FetchStrategy::NetworkFirst,
        }
    }

    /// The partition that stores entries of this class.
    ///
    /// Images share the static partition; they follow the same
    /// cache-first lifetime as the app shell.
    pub fn partition_name(&self, config: &ProxyConfig) -> String {
        match self {
            ResourceClass::Static | ResourceClass::Image => config.static_partition(),
            ResourceClass::Api => config.api_partition(),
            ResourceClass::Dynamic => config.dynamic_partition(),
        }
    }
}

impl std::fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceClass::Static => write!(f, "Static"),
            ResourceClass::Api => write!(f, "Api"),
            ResourceClass::Image => write!(f, "Image"),
            ResourceClass::Dynamic => write!(f, "Dynamic"),
        }
    }
}

/// Classify a request by its URL path. Pure and side-effect-free.
pub fn classify(request: &Request) -> ResourceClass {
    let path = request.path();

    if path.starts_with("/static/") {
        return ResourceClass::Static;
    }
    if path.starts_with("/api/") {
        return ResourceClass::Api;
    }

    match extension(path) {
        Some(ext) if STATIC_EXTENSIONS.contains(&ext) => ResourceClass::Static,
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => ResourceClass::Image,
        _ => ResourceClass::Dynamic,
    }
}

/// Extension of the last path segment, if any. Matching is case-sensitive;
/// paths are expected in their canonical lowercase form.
fn extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rfind('.') {
        Some(idx) if idx + 1 < segment.len() => Some(&segment[idx + 1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_static_prefix() {
        assert_eq!(
            classify(&Request::get("/static/fonts/inter.woff2")),
            ResourceClass::Static
        );
    }

    #[test]
    fn test_classify_static_extension() {
        assert_eq!(classify(&Request::get("/bundle.js")), ResourceClass::Static);
        assert_eq!(classify(&Request::get("/theme.css")), ResourceClass::Static);
    }

    #[test]
    fn test_classify_api_prefix() {
        assert_eq!(
            classify(&Request::get("/api/market/data")),
            ResourceClass::Api
        );
    }

    #[test]
    fn test_classify_prefix_beats_extension() {
        // A png under /api/ is still an API call
        assert_eq!(
            classify(&Request::get("/api/chart.png")),
            ResourceClass::Api
        );
        assert_eq!(
            classify(&Request::get("/static/logo.webp")),
            ResourceClass::Static
        );
    }

    #[test]
    fn test_classify_image_extension() {
        assert_eq!(classify(&Request::get("/hero.webp")), ResourceClass::Image);
        assert_eq!(
            classify(&Request::get("/media/photo.jpeg")),
            ResourceClass::Image
        );
        assert_eq!(classify(&Request::get("/anim.gif")), ResourceClass::Image);
    }

    #[test]
    fn test_classify_dynamic_default() {
        assert_eq!(classify(&Request::get("/")), ResourceClass::Dynamic);
        assert_eq!(
            classify(&Request::get("/portfolio/123")),
            ResourceClass::Dynamic
        );
        assert_eq!(
            classify(&Request::get("/readme.txt")),
            ResourceClass::Dynamic
        );
    }

    #[test]
    fn test_classify_ignores_query_string() {
        assert_eq!(
            classify(&Request::get("https://example.com/api/quotes?symbol=ACME")),
            ResourceClass::Api
        );
        assert_eq!(
            classify(&Request::get("/chart.svg?cache-bust=1")),
            ResourceClass::Static
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let req = Request::get("/api/market/data");
        assert_eq!(classify(&req), classify(&req));
    }

    #[test]
    fn test_strategy_mapping() {
        assert_eq!(ResourceClass::Static.strategy(), FetchStrategy::CacheFirst);
        assert_eq!(ResourceClass::Image.strategy(), FetchStrategy::CacheFirst);
        assert_eq!(ResourceClass::Api.strategy(), FetchStrategy::NetworkFirst);
        assert_eq!(ResourceClass::Dynamic.strategy(), FetchStrategy::NetworkFirst);
    }

    #[test]
    fn test_partition_mapping() {
        let config = ProxyConfig::new("v1.0.0");
        assert_eq!(
            ResourceClass::Static.partition_name(&config),
            "static-v1.0.0"
        );
        assert_eq!(ResourceClass::Image.partition_name(&config), "static-v1.0.0");
        assert_eq!(ResourceClass::Api.partition_name(&config), "api-v1.0.0");
        assert_eq!(
            ResourceClass::Dynamic.partition_name(&config),
            "dynamic-v1.0.0"
        );
    }

    #[test]
    fn test_extension_edge_cases() {
        assert_eq!(extension("/a/b.tar.gz"), Some("gz"));
        assert_eq!(extension("/no-ext"), None);
        assert_eq!(extension("/trailing."), None);
        assert_eq!(extension("/"), None);
    }
}
