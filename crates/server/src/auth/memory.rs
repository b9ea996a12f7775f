// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Principal, Verifier, VerifyError};

use rolegate_type::Roles;

use std::collections::HashMap;

use axum::async_trait;
use openidconnect::AccessToken;

/// [Verifier] resolving a fixed set of tokens, for tests and local runs
/// without an identity provider.
#[derive(Clone, Debug, Default)]
pub struct StaticVerifier(HashMap<String, Principal>);

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as issued to `subject` holding `roles`.
    pub fn token(mut self, token: impl Into<String>, subject: impl Into<String>, roles: Roles) -> Self {
        let _ = self.0.insert(
            token.into(),
            Principal {
                subject: subject.into(),
                roles,
            },
        );
        self
    }
}

#[async_trait]
impl Verifier for StaticVerifier {
    async fn verify(&self, token: AccessToken) -> Result<Principal, VerifyError> {
        self.0
            .get(token.secret())
            .cloned()
            .ok_or(VerifyError::Unknown)
    }
}
