// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Principal, VerifyError};

use rolegate_type::RoleClaims;

use anyhow::Context as _;
use axum::async_trait;
use openidconnect::core::{CoreClient, CoreGenderClaim, CoreProviderMetadata};
use openidconnect::reqwest::async_http_client;
use openidconnect::url::Url;
use openidconnect::{AccessToken, AuthType, ClientId, ClientSecret, IssuerUrl, UserInfoClaims};
use tracing::trace;

/// OpenID Connect client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub issuer: Url,
    pub client_id: String,
    pub client_secret: Option<String>,
    /// Name of the claim holding the principal's roles.
    pub role_claim: String,
}

/// Validates bearer tokens against the provider's UserInfo endpoint.
#[derive(Clone, Debug)]
pub struct Verifier {
    client: CoreClient,
    role_claim: String,
}

impl Verifier {
    pub fn new(client: CoreClient, role_claim: impl Into<String>) -> Self {
        Self {
            client,
            role_claim: role_claim.into(),
        }
    }

    /// Discovers the provider metadata of `config.issuer` and constructs a [Verifier].
    pub async fn discover(config: Config) -> anyhow::Result<Self> {
        let md = CoreProviderMetadata::discover_async(
            IssuerUrl::from_url(config.issuer),
            async_http_client,
        )
        .await
        .context("failed to discover provider metadata")?;
        let client = CoreClient::from_provider_metadata(
            md,
            ClientId::new(config.client_id),
            config.client_secret.map(ClientSecret::new),
        )
        .set_auth_type(AuthType::RequestBody);
        Ok(Self::new(client, config.role_claim))
    }
}

#[async_trait]
impl super::Verifier for Verifier {
    async fn verify(&self, token: AccessToken) -> Result<Principal, VerifyError> {
        let info_req = self
            .client
            .user_info(token, None)
            .map_err(|e| VerifyError::Configuration(e.to_string()))?;

        trace!(target: "server::auth::oidc", "request user info");
        let claims: UserInfoClaims<RoleClaims, CoreGenderClaim> = info_req
            .request_async(async_http_client)
            .await
            .map_err(|e| VerifyError::Rejected(e.to_string()))?;
        trace!(target: "server::auth::oidc", "received user claims: {:?}", claims);

        Ok(Principal {
            subject: claims.subject().as_str().into(),
            roles: claims.additional_claims().roles(&self.role_claim),
        })
    }
}
