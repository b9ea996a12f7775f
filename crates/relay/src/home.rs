// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::Authenticated;

pub async fn index(user: Option<Authenticated>) -> String {
    match user {
        Some(Authenticated { user, .. }) => format!("Logged in as {}.", user.subject),
        None => "Not logged in.".into(),
    }
}
