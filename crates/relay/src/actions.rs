// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

//! Demo actions calling the values API on behalf of the signed in user.

use super::{Authenticated, Settings};

use rolegate_client::Client;
use rolegate_type::Payload;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

pub const INDEX_URI: &str = "/Test";
pub const GET_ALL_VALUES_URI: &str = "/Test/GetAllValues";
pub const GET_BY_ID_URI: &str = "/Test/GetById";
pub const CREATE_URI: &str = "/Test/Create";
pub const UPDATE_URI: &str = "/Test/Update";
pub const DELETE_URI: &str = "/Test/Delete";

const DEFAULT_GET_ID: i32 = 2;
const DEFAULT_DELETE_ID: i32 = 1;

#[derive(Debug, Default, Deserialize)]
pub struct IdRequest {
    pub id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PayloadRequest {
    pub id: Option<i32>,
    pub value: Option<String>,
}

impl PayloadRequest {
    /// Fills missing fields from the current time.
    fn into_payload(self) -> Payload {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Payload {
            id: self.id.unwrap_or(now.subsec_millis() as i32),
            value: self
                .value
                .unwrap_or_else(|| format!("value-{}", now.as_nanos())),
        }
    }
}

/// Outcome of a demo action.
#[derive(Clone, Debug, Serialize)]
pub struct Outcome<T> {
    pub action: &'static str,
    pub result: T,
}

/// Runs `f` with the session's API client on the blocking pool.
async fn call<T, F>(
    action: &'static str,
    user: &Authenticated,
    settings: &Settings,
    f: F,
) -> Result<Json<Outcome<T>>, Response>
where
    T: Send + 'static,
    F: FnOnce(&Client) -> anyhow::Result<T> + Send + 'static,
{
    let client = user.user.client(&settings.api_url);
    debug!(target: "relay::actions", "`{}` calls `{action}`", user.user.subject);
    tokio::task::spawn_blocking(move || f(&client))
        .await
        .map_err(|e| {
            error!(target: "relay::actions", "`{action}` task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })?
        .map(|result| Json(Outcome { action, result }))
        .map_err(|e| {
            warn!(target: "relay::actions", "`{action}` failed: {e:#}");
            (StatusCode::BAD_GATEWAY, format!("{action} failed: {e:#}")).into_response()
        })
}

pub async fn index(Authenticated { user, .. }: Authenticated) -> String {
    let name = user.name.as_deref().unwrap_or(&user.subject);
    format!(
        "Signed in as {name} ({}).\n\n{GET_ALL_VALUES_URI}\n{GET_BY_ID_URI}?id=\n{CREATE_URI}?id=&value=\n{UPDATE_URI}?id=&value=\n{DELETE_URI}?id=\n",
        user.roles
    )
}

pub async fn get_all_values(
    Extension(settings): Extension<Arc<Settings>>,
    user: Authenticated,
) -> Result<Json<Outcome<Vec<String>>>, Response> {
    call("GetAllValues", &user, &settings, |client| client.values().list()).await
}

pub async fn get_by_id(
    Extension(settings): Extension<Arc<Settings>>,
    user: Authenticated,
    Query(IdRequest { id }): Query<IdRequest>,
) -> Result<Json<Outcome<Option<String>>>, Response> {
    let id = id.unwrap_or(DEFAULT_GET_ID);
    call("GetById", &user, &settings, move |client| client.values().get(id)).await
}

pub async fn create(
    Extension(settings): Extension<Arc<Settings>>,
    user: Authenticated,
    Query(req): Query<PayloadRequest>,
) -> Result<Json<Outcome<Payload>>, Response> {
    let payload = req.into_payload();
    call("Create", &user, &settings, move |client| {
        client.values().create(&payload)?;
        Ok(payload)
    })
    .await
}

pub async fn update(
    Extension(settings): Extension<Arc<Settings>>,
    user: Authenticated,
    Query(req): Query<PayloadRequest>,
) -> Result<Json<Outcome<Payload>>, Response> {
    let payload = req.into_payload();
    call("Update", &user, &settings, move |client| {
        client.values().update(&payload)?;
        Ok(payload)
    })
    .await
}

pub async fn delete(
    Extension(settings): Extension<Arc<Settings>>,
    user: Authenticated,
    Query(IdRequest { id }): Query<IdRequest>,
) -> Result<Json<Outcome<i32>>, Response> {
    let id = id.unwrap_or(DEFAULT_DELETE_ID);
    call("Delete", &user, &settings, move |client| {
        client.values().delete(id)?;
        Ok(id)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults() {
        let payload = PayloadRequest::default().into_payload();
        assert!((0..1000).contains(&payload.id));
        assert!(payload.value.starts_with("value-"));

        let payload = PayloadRequest {
            id: Some(7),
            value: Some("seven".into()),
        }
        .into_payload();
        assert_eq!(payload.id, 7);
        assert_eq!(payload.value, "seven");
    }
}
