// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]
#![forbid(unsafe_code)]

mod entity;
mod values;

pub use entity::*;
pub use values::*;

pub use rolegate_type as types;

pub use anyhow::{Context, Result};
pub use url::Url;

use std::fmt;

pub struct Client {
    inner: ureq::Agent,
    root: Url,
    token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("root", &self.root.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Client {
    pub fn builder(url: Url) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.root.join(path).context("failed to construct URL")
    }

    /// Returns the values collection of the API.
    pub fn values(&self) -> Values<'_> {
        Values::new(Entity::new(self))
    }
}

pub struct ClientBuilder {
    inner: ureq::AgentBuilder,
    url: Url,
    token: Option<String>,
}

impl ClientBuilder {
    /// Constructs a new [ClientBuilder] for the API rooted at `url`.
    pub fn new(mut url: Url) -> Self {
        // Relative joins must append to the root path, not replace its last segment.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Self {
            inner: ureq::AgentBuilder::new(),
            url,
            token: None,
        }
    }

    /// Bearer token attached to every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.inner = self.inner.user_agent(user_agent);
        self
    }

    pub fn build(self) -> Client {
        Client {
            inner: self.inner.build(),
            root: self.url,
            token: self.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path() {
        let cl = Client::builder("http://localhost:13826/base".parse().unwrap()).build();
        assert_eq!(
            cl.url("api/values").unwrap().as_str(),
            "http://localhost:13826/base/api/values"
        );

        let cl = Client::builder("http://localhost:13826".parse().unwrap()).build();
        assert_eq!(
            cl.url("api/values/2").unwrap().as_str(),
            "http://localhost:13826/api/values/2"
        );
    }

    #[test]
    fn debug_redacts_token() {
        let cl = Client::builder("http://localhost/".parse().unwrap())
            .token("secret")
            .build();
        let debug = format!("{cl:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[redacted]"));
    }
}
