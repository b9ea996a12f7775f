// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::auth::{op, Authorized};
use super::super::Store;

use rolegate_type::Payload;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::{debug, trace};

/// Creates a value. An existing `id` is left unchanged.
pub async fn post(
    Extension(store): Extension<Arc<Store>>,
    principal: Authorized<op::Create>,
    Json(Payload { id, value }): Json<Payload>,
) -> StatusCode {
    trace!(target: "server::values::post", "called for `{id}` by `{}`", principal.subject);

    if !store.create(id, value) {
        debug!(target: "server::values::post", "`{id}` already exists, ignoring");
    }
    StatusCode::OK
}
