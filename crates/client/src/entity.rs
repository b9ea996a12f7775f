// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Client, Result};

use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::{Request, Response};

#[derive(Clone, Debug)]
pub struct Entity<'a> {
    client: &'a Client,
    path: String,
}

fn parse_ureq_error(e: ureq::Error) -> anyhow::Error {
    match e {
        ureq::Error::Status(code, msg) => match msg.into_string() {
            Ok(msg) if !msg.is_empty() => {
                anyhow!(msg).context(format!("request failed with status code `{code}`"))
            }
            _ => anyhow!("request failed with status code `{code}`"),
        },

        ureq::Error::Transport(e) => anyhow::Error::new(e).context("transport layer failure"),
    }
}

fn ensure_success(res: Response) -> Result<Response> {
    match res.status() {
        200..=299 => Ok(res),
        code => bail!("unexpected status code: {code}"),
    }
}

impl<'a> Entity<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            path: Default::default(),
        }
    }

    /// Returns a child [Entity] rooted at `path`.
    pub fn child(&self, path: &str) -> Self {
        Self {
            client: self.client,
            path: if self.path.is_empty() {
                path.into()
            } else {
                format!("{}/{}", self.path, path)
            },
        }
    }

    fn request(&self, method: &str) -> Result<Request> {
        let url = self.client.url(&self.path)?;
        let req = self.client.inner.request(method, url.as_str());
        Ok(match &self.client.token {
            Some(token) => req.set("Authorization", &format!("Bearer {token}")),
            None => req,
        })
    }

    fn get(&self) -> Result<Response> {
        self.request("GET")?
            .call()
            .map_err(parse_ureq_error)
            .context("GET request failed")
            .and_then(ensure_success)
    }

    pub fn get_json<T: DeserializeOwned>(&self) -> Result<T> {
        self.get()?.into_json().context("failed to decode JSON")
    }

    pub fn get_string(&self) -> Result<String> {
        self.get()?.into_string().context("I/O failure")
    }

    pub fn send_json(&self, method: &str, val: &impl Serialize) -> Result<()> {
        self.request(method)?
            .send_json(val)
            .map_err(parse_ureq_error)
            .with_context(|| format!("{method} request failed"))
            .and_then(ensure_success)
            .map(|_| ())
    }

    pub fn delete(&self) -> Result<()> {
        self.request("DELETE")?
            .call()
            .map_err(parse_ureq_error)
            .context("DELETE request failed")
            .and_then(ensure_success)
            .map(|_| ())
    }
}
