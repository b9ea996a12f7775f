// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::redirect::is_local;
use super::super::session::{session_cookie, Pending, SessionId};
use super::super::{Provider, Sessions, Settings};

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect};
use serde::Deserialize;
use tracing::{debug, trace};

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "returnUrl", alias = "ReturnUrl")]
    pub return_url: Option<String>,
}

/// Starts an authorization code flow and redirects to the identity provider.
pub async fn login(
    Extension(provider): Extension<Arc<Provider>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(sessions): Extension<Arc<Sessions>>,
    SessionId(previous): SessionId,
    Query(LoginRequest { return_url }): Query<LoginRequest>,
) -> impl IntoResponse {
    if let Some(previous) = previous {
        if sessions.end(&previous) {
            trace!(target: "relay::account::login", "ended previous session `{previous}`");
        }
    }

    let return_url = match return_url {
        Some(url) if is_local(&url) => url,
        Some(url) => {
            debug!(target: "relay::account::login", "ignoring non-local return URL {url:?}");
            "/".into()
        }
        None => "/".into(),
    };

    let auth = provider.authorize();
    let id = sessions.begin(Pending::new(auth.csrf, auth.nonce, auth.pkce, return_url));
    debug!(target: "relay::account::login", "started login `{id}`");

    (
        [(SET_COOKIE, session_cookie(&settings, &id))],
        Redirect::to(auth.url.as_str()),
    )
}
