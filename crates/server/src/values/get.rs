// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::auth::{op, Authorized};
use super::super::Store;

use std::sync::Arc;

use axum::extract::Path;
use axum::Extension;
use tracing::{debug, trace};

/// Responds with the value as plain text, or an empty body if `id` is absent.
pub async fn get(
    Extension(store): Extension<Arc<Store>>,
    principal: Authorized<op::Get>,
    Path(id): Path<i32>,
) -> String {
    trace!(target: "server::values::get", "called for `{id}` by `{}`", principal.subject);

    store.get(id).unwrap_or_else(|| {
        debug!(target: "server::values::get", "no value for `{id}`");
        String::new()
    })
}
