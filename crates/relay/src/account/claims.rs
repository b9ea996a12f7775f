// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::super::Authenticated;

use rolegate_type::{Role, Roles};

use axum::Json;
use serde::Serialize;

/// Claims of the signed in user.
#[derive(Clone, Debug, Serialize)]
pub struct Claims {
    pub subject: String,
    pub name: Option<String>,
    pub roles: Roles,
    pub developer: bool,
}

pub async fn claims(Authenticated { user, .. }: Authenticated) -> Json<Claims> {
    Json(Claims {
        subject: user.subject.clone(),
        name: user.name.clone(),
        roles: user.roles.clone(),
        developer: user.roles.contains(Role::DEVELOPER),
    })
}
