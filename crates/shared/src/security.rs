// ABOUTME: Security response headers applied to every companion-server response.
// ABOUTME: Builds the Content-Security-Policy from ordered defaults plus overrides.

use axum::http::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::SharedError;

const DEFAULT_CSP: [(&str, &str); 6] = [
    ("default-src", "'self'"),
    ("script-src", "'self' 'unsafe-inline'"),
    ("style-src", "'self' 'unsafe-inline'"),
    ("img-src", "'self' data:"),
    ("font-src", "'self'"),
    ("connect-src", "'self'"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityOptions {
    /// Directive overrides, e.g. `("img-src", "'self' https:")`.
    pub csp: Vec<(String, String)>,
    pub frame_options: String,
    pub referrer_policy: String,
    pub permissions_policy: String,
}

impl Default for SecurityOptions {
    fn default() -> Self {
        Self {
            csp: Vec::new(),
            frame_options: "DENY".into(),
            referrer_policy: "strict-origin-when-cross-origin".into(),
            permissions_policy: "geolocation=(), microphone=(), camera=()".into(),
        }
    }
}

impl SecurityOptions {
    /// Default directives in their fixed order, overridden in place; new
    /// directives follow in the order given.
    pub fn build_csp(&self) -> String {
        let mut directives: Vec<(String, String)> = DEFAULT_CSP
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (name, value) in &self.csp {
            match directives.iter_mut().find(|(k, _)| k == name) {
                Some(existing) => existing.1 = value.clone(),
                None => directives.push((name.clone(), value.clone())),
            }
        }
        directives
            .iter()
            .map(|(k, v)| format!("{k} {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>, SharedError> {
        let pairs = [
            ("content-security-policy", self.build_csp()),
            ("x-frame-options", self.frame_options.clone()),
            ("x-content-type-options", "nosniff".to_string()),
            ("referrer-policy", self.referrer_policy.clone()),
            ("permissions-policy", self.permissions_policy.clone()),
        ];
        pairs
            .into_iter()
            .map(|(name, value)| {
                let header_value =
                    HeaderValue::from_str(&value).map_err(|_| SharedError::Header {
                        name: name.to_string(),
                        value: value.clone(),
                    })?;
                Ok((HeaderName::from_static(name), header_value))
            })
            .collect()
    }

    pub fn layers(&self) -> Result<Vec<SetResponseHeaderLayer<HeaderValue>>, SharedError> {
        Ok(self
            .headers()?
            .into_iter()
            .map(|(name, value)| SetResponseHeaderLayer::overriding(name, value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_policy() {
        assert_eq!(
            SecurityOptions::default().build_csp(),
            "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'"
        );
    }

    #[test]
    fn overrides_keep_order_and_append_new_directives() {
        let options = SecurityOptions {
            csp: vec![
                ("frame-ancestors".into(), "'none'".into()),
                ("img-src".into(), "'self' https:".into()),
            ],
            ..SecurityOptions::default()
        };
        let csp = options.build_csp();
        assert!(csp.contains("; img-src 'self' https:; font-src"));
        assert!(csp.ends_with("connect-src 'self'; frame-ancestors 'none'"));
    }

    #[test]
    fn rejects_unencodable_values() {
        let options = SecurityOptions {
            frame_options: "DENY\n".into(),
            ..SecurityOptions::default()
        };
        assert!(options.headers().is_err());
    }
}
