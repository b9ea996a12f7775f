// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::auth::{op, Authorized};
use super::super::Store;

use rolegate_type::Payload;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::trace;

pub async fn put(
    Extension(store): Extension<Arc<Store>>,
    principal: Authorized<op::Update>,
    Json(Payload { id, value }): Json<Payload>,
) -> StatusCode {
    trace!(target: "server::values::put", "called for `{id}` by `{}`", principal.subject);

    let _ = store.update(id, value);
    StatusCode::OK
}
