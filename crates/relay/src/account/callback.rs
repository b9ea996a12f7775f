// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::redirect::location;
use super::super::session::{session_cookie, SessionId};
use super::super::{Provider, Sessions, Settings};

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Completes the authorization code flow started by [super::login].
pub async fn callback(
    Extension(provider): Extension<Arc<Provider>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(sessions): Extension<Arc<Sessions>>,
    SessionId(id): SessionId,
    Query(req): Query<CallbackRequest>,
) -> Result<impl IntoResponse, Response> {
    let pending = id.and_then(|id| sessions.take_pending(&id));

    if let Some(error) = req.error {
        let msg = match req.error_description {
            Some(desc) => format!("Identity provider returned an error: {error}: {desc}"),
            None => format!("Identity provider returned an error: {error}"),
        };
        debug!(target: "relay::account::callback", "{msg}");
        return Err((StatusCode::BAD_REQUEST, msg).into_response());
    }

    let pending = pending.ok_or_else(|| {
        debug!(target: "relay::account::callback", "no login in progress");
        (StatusCode::BAD_REQUEST, "No login in progress").into_response()
    })?;

    match req.state {
        Some(ref state) if state == pending.csrf.secret() => {}
        _ => {
            warn!(target: "relay::account::callback", "state mismatch");
            return Err((StatusCode::BAD_REQUEST, "State mismatch").into_response());
        }
    }

    let code = req.code.ok_or_else(|| {
        (StatusCode::BAD_REQUEST, "Authorization code missing").into_response()
    })?;

    let user = provider
        .exchange(code, pending.pkce, &pending.nonce)
        .await
        .map_err(|e| {
            warn!(target: "relay::account::callback", "failed to sign in: {e:#}");
            (StatusCode::BAD_GATEWAY, format!("Failed to sign in: {e:#}")).into_response()
        })?;
    info!(target: "relay::account::callback", "signed in `{}` with roles `{}`", user.subject, user.roles);
    debug!(
        target: "relay::account::callback",
        "refresh token issued: {}",
        user.refresh_token().is_some()
    );

    let redirect = location(&settings.local(&pending.return_url))?;
    let id = sessions.authenticate(user);
    Ok((
        StatusCode::SEE_OTHER,
        [(SET_COOKIE, session_cookie(&settings, &id))],
        redirect,
    ))
}
