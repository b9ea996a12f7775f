// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Role, Roles};

use std::collections::BTreeMap;

use openidconnect::AdditionalClaims;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim type the identity provider uses for roles unless configured otherwise.
pub const DEFAULT_ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/roles";

/// Non-standard claims of an OpenID Connect principal.
///
/// The role claim name is provider-specific, so all unknown claims are kept
/// and the roles are looked up by name with [RoleClaims::roles].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RoleClaims {
    #[serde(flatten)]
    pub claims: BTreeMap<String, Value>,
}

impl AdditionalClaims for RoleClaims {}

impl RoleClaims {
    /// Returns the roles stored under `claim`.
    ///
    /// The claim may hold a single role name or an array of them. Values
    /// which are not valid role names are skipped.
    pub fn roles(&self, claim: &str) -> Roles {
        match self.claims.get(claim) {
            Some(Value::String(role)) => role.parse::<Role>().into_iter().collect(),
            Some(Value::Array(roles)) => roles
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|role| role.parse().ok())
                .collect(),
            _ => Roles::default(),
        }
    }
}
