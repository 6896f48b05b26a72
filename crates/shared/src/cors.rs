// ABOUTME: CORS policy for the companion server.
// ABOUTME: Translates origin, method and header allow-lists into a tower-http CorsLayer.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsOptions {
    /// Allowed origins; `*` allows every origin.
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub headers: Vec<String>,
    pub credentials: bool,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            origins: vec!["*".into()],
            methods: vec!["GET".into(), "POST".into(), "OPTIONS".into()],
            headers: vec!["Content-Type".into()],
            credentials: false,
        }
    }
}

impl CorsOptions {
    fn allows_any_origin(&self) -> bool {
        self.origins.iter().any(|o| o == "*")
    }

    /// Builds the layer. A wildcard with credentials echoes the request origin,
    /// since browsers refuse `*` on credentialed requests.
    pub fn layer(&self) -> CorsLayer {
        let origin = if self.allows_any_origin() {
            if self.credentials {
                AllowOrigin::mirror_request()
            } else {
                AllowOrigin::from(Any)
            }
        } else {
            AllowOrigin::list(
                self.origins
                    .iter()
                    .filter_map(|o| HeaderValue::from_str(o).ok()),
            )
        };

        let methods: Vec<Method> = self
            .methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        let headers: Vec<HeaderName> = self
            .headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(self.credentials)
    }
}
