// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::Settings;

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{Extension, FromRequest, RequestParts};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;
use url::Url;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Scheme, host and path base a request was addressed to, honoring proxy headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
    pub base: String,
}

fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl RequestOrigin {
    /// Determines the origin of a request with `headers` served under `settings`.
    pub fn new(settings: &Settings, headers: &HeaderMap) -> Self {
        let scheme = first_value(headers, FORWARDED_PROTO)
            .unwrap_or_else(|| settings.public_url.scheme())
            .to_string();
        let host = first_value(headers, FORWARDED_HOST)
            .or_else(|| first_value(headers, HOST.as_str()))
            .map(ToString::to_string)
            .unwrap_or_else(|| {
                let url = &settings.public_url;
                match (url.host_str(), url.port()) {
                    (Some(host), Some(port)) => format!("{host}:{port}"),
                    (Some(host), None) => host.to_string(),
                    (None, _) => "localhost".into(),
                }
            });
        Self {
            scheme,
            host,
            base: settings.path_base().to_string(),
        }
    }

    /// Resolves `uri` against this origin. Absolute URIs are returned unchanged.
    pub fn resolve(&self, uri: &str) -> String {
        if Url::parse(uri).is_ok() {
            return uri.to_string();
        }
        let path = if uri.starts_with('/') {
            uri.to_string()
        } else {
            format!("/{uri}")
        };
        format!("{}://{}{}{path}", self.scheme, self.host, self.base)
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for RequestOrigin {
    type Rejection = Response;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(settings) = req
            .extract::<Extension<Arc<Settings>>>()
            .await
            .map_err(|e| {
                error!(target: "relay::origin", "settings extension missing: {e}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })?;
        Ok(Self::new(&settings, req.headers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::HeaderValue;

    fn settings(public_url: &str) -> Settings {
        Settings {
            public_url: public_url.parse().unwrap(),
            api_url: "http://localhost:13826/".parse().unwrap(),
        }
    }

    #[test]
    fn fallback_to_public_url() {
        let origin = RequestOrigin::new(&settings("http://localhost:5000/"), &HeaderMap::new());
        assert_eq!(origin.resolve("/"), "http://localhost:5000/");
    }

    #[test]
    fn host_header() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(HOST, HeaderValue::from_static("relay.example"));
        let origin = RequestOrigin::new(&settings("https://example.com/app/"), &headers);
        assert_eq!(origin.resolve("/"), "https://relay.example/app/");
        assert_eq!(origin.resolve("Test"), "https://relay.example/app/Test");
        assert_eq!(
            origin.resolve("https://elsewhere.example/"),
            "https://elsewhere.example/"
        );
    }

    #[test]
    fn forwarded_headers() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(HOST, HeaderValue::from_static("internal:5000"));
        let _ = headers.insert(FORWARDED_PROTO, HeaderValue::from_static("https, http"));
        let _ = headers.insert(FORWARDED_HOST, HeaderValue::from_static("public.example"));
        let origin = RequestOrigin::new(&settings("http://localhost:5000/"), &headers);
        assert_eq!(
            origin,
            RequestOrigin {
                scheme: "https".into(),
                host: "public.example".into(),
                base: "".into(),
            }
        );
    }
}
