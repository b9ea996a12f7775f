// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{AuthRedirect, Settings};

use rolegate_client::Client;
use rolegate_type::Roles;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::async_trait;
use axum::extract::{Extension, FromRequest, RequestParts, TypedHeader};
use axum::headers::Cookie;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use openidconnect::{AccessToken, CsrfToken, Nonce, PkceCodeVerifier, RefreshToken};
use tracing::{debug, error, trace};
use url::Url;
use uuid::Uuid;

pub const COOKIE_NAME: &str = "SESSION";

/// How long a login may stay pending before it is evicted.
pub const PENDING_TTL: Duration = Duration::from_secs(10 * 60);

const USER_AGENT: &str = concat!("rolegate-relay/", env!("CARGO_PKG_VERSION"));

/// Login state held between the redirect to the identity provider and its callback.
#[derive(Debug)]
pub struct Pending {
    pub csrf: CsrfToken,
    pub nonce: Nonce,
    pub pkce: PkceCodeVerifier,
    /// App-relative path to return to after sign-in.
    pub return_url: String,
    created: Instant,
}

impl Pending {
    pub fn new(csrf: CsrfToken, nonce: Nonce, pkce: PkceCodeVerifier, return_url: String) -> Self {
        Self {
            csrf,
            nonce,
            pkce,
            return_url,
            created: Instant::now(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) > PENDING_TTL
    }
}

/// A signed in user and the credentials captured at sign-in.
#[derive(Debug)]
pub struct User {
    pub subject: String,
    pub name: Option<String>,
    pub roles: Roles,
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
    client: OnceCell<Arc<Client>>,
}

impl User {
    pub fn new(
        subject: impl Into<String>,
        name: Option<String>,
        roles: Roles,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) -> Self {
        Self {
            subject: subject.into(),
            name,
            roles,
            access_token,
            refresh_token,
            client: OnceCell::new(),
        }
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    /// Returns the values API client of this session, built on first use
    /// with the session's access token as bearer credential.
    pub fn client(&self, api: &Url) -> Arc<Client> {
        Arc::clone(self.client.get_or_init(|| {
            trace!(target: "relay::session", "building API client for `{}`", self.subject);
            Arc::new(
                Client::builder(api.clone())
                    .token(self.access_token.secret())
                    .user_agent(USER_AGENT)
                    .build(),
            )
        }))
    }
}

#[derive(Debug)]
pub enum Session {
    Pending(Pending),
    Authenticated(Arc<User>),
}

/// Server-side session store keyed by the session cookie.
#[derive(Debug, Default)]
pub struct Sessions(DashMap<Uuid, Session>);

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `pending` under a new session id, evicting expired pending logins.
    pub fn begin(&self, pending: Pending) -> Uuid {
        self.evict_expired(Instant::now());
        let id = Uuid::new_v4();
        let _ = self.0.insert(id, Session::Pending(pending));
        id
    }

    /// Removes and returns the pending login of session `id`, unless it expired.
    ///
    /// An authenticated session is left untouched.
    pub fn take_pending(&self, id: &Uuid) -> Option<Pending> {
        match self
            .0
            .remove_if(id, |_, session| matches!(session, Session::Pending(_)))
        {
            Some((_, Session::Pending(pending))) if !pending.is_expired(Instant::now()) => {
                Some(pending)
            }
            Some(_) => {
                debug!(target: "relay::session", "pending login `{id}` expired");
                None
            }
            None => None,
        }
    }

    /// Drops pending logins started more than [PENDING_TTL] before `now`.
    pub fn evict_expired(&self, now: Instant) {
        let before = self.0.len();
        self.0.retain(|_, session| match session {
            Session::Pending(pending) => !pending.is_expired(now),
            Session::Authenticated(_) => true,
        });
        let evicted = before.saturating_sub(self.0.len());
        if evicted > 0 {
            debug!(target: "relay::session", "evicted {evicted} expired pending logins");
        }
    }

    /// Stores `user` under a new session id.
    pub fn authenticate(&self, user: User) -> Uuid {
        let id = Uuid::new_v4();
        let _ = self.0.insert(id, Session::Authenticated(Arc::new(user)));
        id
    }

    pub fn user(&self, id: &Uuid) -> Option<Arc<User>> {
        self.0.get(id).and_then(|session| match session.value() {
            Session::Authenticated(user) => Some(Arc::clone(user)),
            Session::Pending(_) => None,
        })
    }

    /// Removes session `id`, returning whether it existed.
    pub fn end(&self, id: &Uuid) -> bool {
        self.0.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `Set-Cookie` value binding the browser to session `id`.
pub fn session_cookie(settings: &Settings, id: &Uuid) -> String {
    let mut cookie = format!(
        "{COOKIE_NAME}={id}; Path={}/; HttpOnly; SameSite=Lax",
        settings.path_base()
    );
    if settings.is_secure() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session cookie.
pub fn expired_session_cookie(settings: &Settings) -> String {
    format!(
        "{COOKIE_NAME}=; Path={}/; Max-Age=0; HttpOnly; SameSite=Lax",
        settings.path_base()
    )
}

/// The session id carried by the request's cookie, if any.
#[derive(Clone, Copy, Debug)]
pub struct SessionId(pub Option<Uuid>);

#[async_trait]
impl<B: Send> FromRequest<B> for SessionId {
    type Rejection = std::convert::Infallible;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let cookies = req.extract::<Option<TypedHeader<Cookie>>>().await?;
        Ok(Self(
            cookies
                .as_ref()
                .and_then(|TypedHeader(cookies)| cookies.get(COOKIE_NAME))
                .and_then(|id| id.parse().ok()),
        ))
    }
}

/// An authenticated request. Rejects with a redirect to the login page.
#[derive(Clone, Debug)]
pub struct Authenticated {
    pub id: Uuid,
    pub user: Arc<User>,
}

#[async_trait]
impl<B: Send> FromRequest<B> for Authenticated {
    type Rejection = AuthRedirect;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let return_url = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".into());

        let Extension(settings) = req
            .extract::<Extension<Arc<Settings>>>()
            .await
            .map_err(|_| {
                error!(target: "relay::session", "settings extension missing");
                AuthRedirect::new("", &return_url)
            })?;
        let redirect = || AuthRedirect::new(settings.path_base(), &return_url);

        let Extension(sessions) = req
            .extract::<Extension<Arc<Sessions>>>()
            .await
            .map_err(|_| {
                error!(target: "relay::session", "session store extension missing");
                redirect()
            })?;

        let SessionId(id) = req
            .extract::<SessionId>()
            .await
            .map_err(|e| match e {})?;
        let id = id.ok_or_else(redirect)?;
        match sessions.user(&id) {
            Some(user) => Ok(Self { id, user }),
            None => {
                debug!(target: "relay::session", "no authenticated session `{id}`");
                Err(redirect())
            }
        }
    }
}
