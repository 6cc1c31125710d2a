//! CORS policy for the agent HTTP surface.
//!
//! Mirrors the deployed frontend setup: a static allowlist of local dev
//! origins and the production host, an optional extra origin from
//! configuration, and any subdomain of telex.im. Requests without an Origin
//! header (curl, server-to-server) are allowed through untouched.

use lambda_http::http::header::HeaderValue;
use lambda_http::{Body, Response};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

static STATIC_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:4173",
    "https://telex.im",
];

/// Origin allowlist with a telex.im subdomain carve-out.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    /// Build the policy, optionally adding the configured frontend URL.
    pub fn new(frontend_url: Option<String>) -> Self {
        let mut allowed_origins: Vec<String> =
            STATIC_ORIGINS.iter().map(|s| s.to_string()).collect();
        if let Some(url) = frontend_url {
            allowed_origins.push(url);
        }
        Self { allowed_origins }
    }

    /// Check whether an Origin header value is allowed.
    pub fn origin_allowed(&self, origin: &str) -> bool {
        if self.allowed_origins.iter().any(|o| o == origin) {
            return true;
        }

        match hostname(origin) {
            Some(host) => {
                let host = host.to_lowercase();
                host == "telex.im" || host.ends_with(".telex.im")
            }
            None => false,
        }
    }

    /// Attach CORS headers to a response for an allowed origin.
    ///
    /// Requests without an origin, or with a disallowed one, get no CORS
    /// headers (the browser then blocks the cross-origin read).
    pub fn apply(&self, mut response: Response<Body>, origin: Option<&str>) -> Response<Body> {
        if let Some(origin) = origin {
            if self.origin_allowed(origin) {
                if let Ok(value) = HeaderValue::from_str(origin) {
                    let headers = response.headers_mut();
                    headers.insert("access-control-allow-origin", value);
                    headers.insert(
                        "access-control-allow-methods",
                        HeaderValue::from_static(ALLOWED_METHODS),
                    );
                    headers.insert(
                        "access-control-allow-headers",
                        HeaderValue::from_static(ALLOWED_HEADERS),
                    );
                    headers.insert(
                        "access-control-allow-credentials",
                        HeaderValue::from_static("true"),
                    );
                }
            }
        }
        response
    }

    /// Answer a CORS preflight request.
    pub fn preflight(&self, origin: Option<&str>) -> Response<Body> {
        let allowed = match origin {
            Some(origin) => self.origin_allowed(origin),
            None => true,
        };
        let status = if allowed { 204 } else { 403 };
        let response = Response::builder()
            .status(status)
            .body(Body::Empty)
            .expect("Failed to build response");
        if allowed {
            self.apply(response, origin)
        } else {
            response
        }
    }
}

/// Extract the hostname from an origin like `https://app.telex.im:443`.
fn hostname(origin: &str) -> Option<&str> {
    let rest = origin.split_once("://")?.1;
    let host_port = rest.split(['/', '?', '#']).next()?;
    let host = host_port.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_origins_allowed() {
        let policy = CorsPolicy::new(None);
        assert!(policy.origin_allowed("http://localhost:3000"));
        assert!(policy.origin_allowed("https://telex.im"));
    }

    #[test]
    fn test_telex_subdomains_allowed() {
        let policy = CorsPolicy::new(None);
        assert!(policy.origin_allowed("https://app.telex.im"));
        assert!(policy.origin_allowed("https://Foo.Telex.IM"));
        assert!(policy.origin_allowed("https://app.telex.im:8443"));
    }

    #[test]
    fn test_lookalike_hosts_rejected() {
        let policy = CorsPolicy::new(None);
        assert!(!policy.origin_allowed("https://eviltelex.im"));
        assert!(!policy.origin_allowed("https://telex.im.evil.com"));
        assert!(!policy.origin_allowed("http://localhost:9999"));
    }

    #[test]
    fn test_malformed_origin_rejected() {
        let policy = CorsPolicy::new(None);
        assert!(!policy.origin_allowed("not-a-url"));
        assert!(!policy.origin_allowed(""));
    }

    #[test]
    fn test_frontend_url_from_config_allowed() {
        let policy = CorsPolicy::new(Some("https://holidays.example.com".to_string()));
        assert!(policy.origin_allowed("https://holidays.example.com"));
    }

    #[test]
    fn test_preflight_statuses() {
        let policy = CorsPolicy::new(None);
        assert_eq!(policy.preflight(Some("https://telex.im")).status(), 204);
        assert_eq!(policy.preflight(Some("https://evil.example")).status(), 403);
        assert_eq!(policy.preflight(None).status(), 204);
    }
}
