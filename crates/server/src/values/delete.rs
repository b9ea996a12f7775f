// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::auth::{op, Authorized};
use super::super::Store;

use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::Extension;
use tracing::{debug, trace};

pub async fn delete(
    Extension(store): Extension<Arc<Store>>,
    principal: Authorized<op::Delete>,
    Path(id): Path<i32>,
) -> StatusCode {
    trace!(target: "server::values::delete", "called for `{id}` by `{}`", principal.subject);

    if store.delete(id).is_none() {
        debug!(target: "server::values::delete", "no value for `{id}`");
    }
    StatusCode::OK
}
