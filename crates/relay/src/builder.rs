// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{account, actions, home, OidcClient, Provider, Sessions};

use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{Extension, Router};
use openidconnect::RedirectUrl;
use tracing::debug;
use url::Url;

pub const HOME_URI: &str = "/";
pub const LOGIN_URI: &str = "/Account/Login";
pub const LOGOUT_URI: &str = "/Account/Logout";
pub const CLAIMS_URI: &str = "/Account/Claims";
pub const CALLBACK_URI: &str = "/signin-auth0";

/// Relay configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Identity provider domain, e.g. `tenant.eu.auth0.com`.
    pub domain: String,
    pub client_id: String,
    pub client_secret: Option<String>,
    /// Identifier of the values API the access token is requested for.
    pub audience: String,
    /// Name of the claim holding the principal's roles.
    pub role_claim: String,
    /// URL the relay is reachable at by browsers.
    pub public_url: Url,
    /// Root URL of the values API.
    pub api_url: Url,
}

/// Request-independent relay settings shared by all handlers.
#[derive(Clone, Debug)]
pub struct Settings {
    pub public_url: Url,
    pub api_url: Url,
}

impl Settings {
    /// Path the relay is mounted at, without trailing slash.
    pub fn path_base(&self) -> &str {
        self.public_url.path().trim_end_matches('/')
    }

    /// Prefixes the app-relative `path` with the path base.
    pub fn local(&self, path: &str) -> String {
        format!("{}{path}", self.path_base())
    }

    pub fn is_secure(&self) -> bool {
        self.public_url.scheme() == "https"
    }
}

/// Relay builder.
pub struct Builder {
    config: Config,
    sessions: Option<Arc<Sessions>>,
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl Builder {
    /// Constructs a new [Builder].
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sessions: None,
        }
    }

    /// Use `sessions` as the session store instead of an empty one.
    pub fn sessions(mut self, sessions: Arc<Sessions>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Discovers the identity provider metadata and builds the relay.
    pub async fn discover(self) -> anyhow::Result<Router> {
        let provider = Provider::discover(&self.config).await?;
        self.build_with(provider)
    }

    /// Builds the relay around an already configured OpenID Connect client.
    pub fn build(self, client: OidcClient) -> anyhow::Result<Router> {
        let provider = Provider::new(client, &self.config)?;
        self.build_with(provider)
    }

    fn build_with(self, provider: Provider) -> anyhow::Result<Router> {
        let public_url = with_trailing_slash(self.config.public_url);
        let redirect = public_url
            .join(CALLBACK_URI.trim_start_matches('/'))
            .context("failed to construct redirect URL")?;
        debug!(target: "relay::builder", "using redirect URL `{redirect}`");
        let provider = provider.redirect_url(RedirectUrl::from_url(redirect));

        let settings = Settings {
            public_url,
            api_url: self.config.api_url,
        };
        let sessions = self.sessions.unwrap_or_default();

        Ok(Router::new()
            .route(HOME_URI, get(home::index))
            .route(LOGIN_URI, get(account::login))
            .route(CALLBACK_URI, get(account::callback))
            .route(LOGOUT_URI, get(account::logout))
            .route(CLAIMS_URI, get(account::claims))
            .route(actions::INDEX_URI, get(actions::index))
            .route(actions::GET_ALL_VALUES_URI, get(actions::get_all_values))
            .route(actions::GET_BY_ID_URI, get(actions::get_by_id))
            .route(actions::CREATE_URI, get(actions::create))
            .route(actions::UPDATE_URI, get(actions::update))
            .route(actions::DELETE_URI, get(actions::delete))
            .layer(Extension(Arc::new(provider)))
            .layer(Extension(Arc::new(settings)))
            .layer(Extension(sessions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(public_url: &str) -> Settings {
        Settings {
            public_url: with_trailing_slash(public_url.parse().unwrap()),
            api_url: "http://localhost:13826/".parse().unwrap(),
        }
    }

    #[test]
    fn path_base() {
        let root = settings("http://localhost:5000");
        assert_eq!(root.path_base(), "");
        assert_eq!(root.local("/Test"), "/Test");
        assert!(!root.is_secure());

        let nested = settings("https://example.com/relay");
        assert_eq!(nested.path_base(), "/relay");
        assert_eq!(nested.local("/"), "/relay/");
        assert!(nested.is_secure());
    }
}
