// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::auth::{op, Authorized};
use super::super::Store;

use std::sync::Arc;

use axum::{Extension, Json};
use tracing::trace;

pub async fn list(
    Extension(store): Extension<Arc<Store>>,
    principal: Authorized<op::List>,
) -> Json<Vec<String>> {
    trace!(target: "server::values::list", "called by `{}`", principal.subject);

    Json(store.list())
}
