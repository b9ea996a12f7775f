// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::LOGIN_URI;

use axum::http::header::{HeaderName, LOCATION};
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::error;
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Redirect of an unauthenticated request to the login page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRedirect {
    pub location: String,
}

impl AuthRedirect {
    /// Redirects to the login page under `path_base`, returning to `return_url` afterwards.
    pub fn new(path_base: &str, return_url: &str) -> Self {
        let return_url: String = byte_serialize(return_url.as_bytes()).collect();
        Self {
            location: format!("{path_base}{LOGIN_URI}?returnUrl={return_url}"),
        }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.location).into_response()
    }
}

/// Constructs the identity provider logout URL returning to `return_to`.
pub fn logout_url(endpoint: &Url, client_id: &str, return_to: Option<&str>) -> Url {
    let mut url = endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        let _ = query.append_pair("client_id", client_id);
        if let Some(return_to) = return_to {
            let _ = query.append_pair("returnTo", return_to);
        }
    }
    url
}

/// Whether `url` is an app-relative path which is safe to redirect to.
///
/// Control characters and backslashes are rejected, since browsers strip or
/// normalize them and may turn the path into a network-path reference.
pub(crate) fn is_local(url: &str) -> bool {
    if !url.starts_with('/') || url.starts_with("//") {
        return false;
    }
    if url.chars().any(|c| c.is_control() || c == '\\') {
        return false;
    }
    match url.parse::<Uri>() {
        Ok(uri) => uri.scheme().is_none() && uri.authority().is_none(),
        Err(_) => false,
    }
}

/// `Location` header part redirecting to `location`.
pub(crate) fn location(uri: &str) -> Result<[(HeaderName, HeaderValue); 1], Response> {
    HeaderValue::from_str(uri)
        .map(|value| [(LOCATION, value)])
        .map_err(|e| {
            error!(target: "relay::redirect", "invalid redirect location {uri:?}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
