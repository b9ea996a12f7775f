// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::redirect::is_local;
use super::super::session::expired_session_cookie;
use super::super::{logout_url, Authenticated, Provider, RequestOrigin, Sessions, Settings};

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    #[serde(rename = "returnUrl", alias = "ReturnUrl")]
    pub return_url: Option<String>,
}

/// Ends the session and signs out of the identity provider.
pub async fn logout(
    Extension(provider): Extension<Arc<Provider>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(sessions): Extension<Arc<Sessions>>,
    Authenticated { id, user }: Authenticated,
    origin: RequestOrigin,
    Query(LogoutRequest { return_url }): Query<LogoutRequest>,
) -> impl IntoResponse {
    let _ = sessions.end(&id);
    info!(target: "relay::account::logout", "signed out `{}`", user.subject);

    let return_to = match return_url.as_deref() {
        Some("") => None,
        Some(url) if is_local(url) => Some(origin.resolve(url)),
        Some(url) => {
            debug!(target: "relay::account::logout", "ignoring non-local return URL {url:?}");
            Some(origin.resolve("/"))
        }
        None => Some(origin.resolve("/")),
    };
    let url = logout_url(
        provider.logout_endpoint(),
        provider.client_id(),
        return_to.as_deref(),
    );

    (
        [(SET_COOKIE, expired_session_cookie(&settings))],
        Redirect::to(url.as_str()),
    )
}
