// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Config, User};

use rolegate_type::{RoleClaims, Roles};

use anyhow::Context;
use openidconnect::core::{
    CoreAuthDisplay, CoreAuthPrompt, CoreAuthenticationFlow, CoreErrorResponseType,
    CoreGenderClaim, CoreJsonWebKey, CoreJsonWebKeyType, CoreJsonWebKeyUse,
    CoreJweContentEncryptionAlgorithm, CoreJwsSigningAlgorithm, CoreProviderMetadata,
    CoreRevocableToken, CoreRevocationErrorResponse, CoreTokenIntrospectionResponse, CoreTokenType,
};
use openidconnect::reqwest::async_http_client;
use openidconnect::url::Url;
use openidconnect::{
    AccessToken, AuthType, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken,
    EmptyExtraTokenFields, IdTokenFields, IssuerUrl, Nonce, OAuth2TokenResponse,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, StandardErrorResponse,
    StandardTokenResponse, SubjectIdentifier, TokenResponse, UserInfoClaims,
};
use tracing::{debug, trace, warn};

/// Token response whose ID token carries [RoleClaims].
pub type RoleTokenResponse = StandardTokenResponse<
    IdTokenFields<
        RoleClaims,
        EmptyExtraTokenFields,
        CoreGenderClaim,
        CoreJweContentEncryptionAlgorithm,
        CoreJwsSigningAlgorithm,
        CoreJsonWebKeyType,
    >,
    CoreTokenType,
>;

/// OpenID Connect client which keeps the non-standard ID token claims.
pub type OidcClient = Client<
    RoleClaims,
    CoreAuthDisplay,
    CoreGenderClaim,
    CoreJweContentEncryptionAlgorithm,
    CoreJwsSigningAlgorithm,
    CoreJsonWebKeyType,
    CoreJsonWebKeyUse,
    CoreJsonWebKey,
    CoreAuthPrompt,
    StandardErrorResponse<CoreErrorResponseType>,
    RoleTokenResponse,
    CoreTokenType,
    CoreTokenIntrospectionResponse,
    CoreRevocableToken,
    CoreRevocationErrorResponse,
>;

/// The identity provider the relay signs users in with.
#[derive(Clone, Debug)]
pub struct Provider {
    client: OidcClient,
    client_id: String,
    audience: String,
    role_claim: String,
    logout: Url,
}

/// A started authorization request.
#[derive(Debug)]
pub struct Authorization {
    pub url: Url,
    pub csrf: CsrfToken,
    pub nonce: Nonce,
    pub pkce: PkceCodeVerifier,
}

impl Provider {
    /// Constructs a [Provider] around an already configured `client`.
    pub fn new(client: OidcClient, config: &Config) -> anyhow::Result<Self> {
        let logout = format!("https://{}/v2/logout", config.domain)
            .parse()
            .context("failed to construct logout endpoint URL")?;
        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            audience: config.audience.clone(),
            role_claim: config.role_claim.clone(),
            logout,
        })
    }

    /// Discovers the provider metadata of `https://{config.domain}/`.
    pub async fn discover(config: &Config) -> anyhow::Result<Self> {
        let issuer = IssuerUrl::new(format!("https://{}/", config.domain))
            .context("failed to construct issuer URL")?;
        let md = CoreProviderMetadata::discover_async(issuer, async_http_client)
            .await
            .context("failed to discover provider metadata")?;
        let client = OidcClient::from_provider_metadata(
            md,
            ClientId::new(config.client_id.clone()),
            config.client_secret.clone().map(ClientSecret::new),
        )
        .set_auth_type(AuthType::RequestBody);
        Self::new(client, config)
    }

    pub(crate) fn redirect_url(mut self, url: RedirectUrl) -> Self {
        self.client = self.client.set_redirect_uri(url);
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The provider's logout endpoint.
    pub fn logout_endpoint(&self) -> &Url {
        &self.logout
    }

    /// Starts an authorization code flow scoped to the values API.
    pub fn authorize(&self) -> Authorization {
        let (challenge, pkce) = PkceCodeChallenge::new_random_sha256();
        let (url, csrf, nonce) = self
            .client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .add_scope(Scope::new("profile".into()))
            .add_extra_param("audience", self.audience.as_str())
            .set_pkce_challenge(challenge)
            .url();
        Authorization {
            url,
            csrf,
            nonce,
            pkce,
        }
    }

    /// Exchanges `code` for tokens and verifies the returned ID token.
    pub async fn exchange(
        &self,
        code: String,
        pkce: PkceCodeVerifier,
        nonce: &Nonce,
    ) -> anyhow::Result<User> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce)
            .request_async(async_http_client)
            .await
            .context("failed to exchange authorization code")?;
        trace!(target: "relay::provider", "received token response");

        let (subject, name, roles) = {
            let claims = token
                .id_token()
                .context("identity provider returned no ID token")?
                .claims(&self.client.id_token_verifier(), nonce)
                .context("failed to verify ID token")?;
            let name = claims
                .name()
                .and_then(|name| name.get(None))
                .map(|name| name.as_str().to_owned());
            let roles = claims.additional_claims().roles(&self.role_claim);
            (claims.subject().clone(), name, roles)
        };

        let roles = if roles.is_empty() {
            trace!(target: "relay::provider", "no roles in ID token, asking user info");
            self.roles(token.access_token(), subject.clone()).await
        } else {
            roles
        };
        Ok(User::new(
            subject.as_str(),
            name,
            roles,
            token.access_token().clone(),
            token.refresh_token().cloned(),
        ))
    }

    /// Fetches the role claim set of `subject` from the UserInfo endpoint.
    ///
    /// Only consulted when the ID token carries no roles.
    ///
    /// Failures are logged and yield no roles; the values API authorizes on
    /// its own.
    async fn roles(&self, token: &AccessToken, subject: SubjectIdentifier) -> Roles {
        let info_req = match self.client.user_info(token.clone(), Some(subject)) {
            Ok(info_req) => info_req,
            Err(e) => {
                debug!(target: "relay::provider", "user info unavailable: {e}");
                return Roles::default();
            }
        };
        let claims: Result<UserInfoClaims<RoleClaims, CoreGenderClaim>, _> =
            info_req.request_async(async_http_client).await;
        match claims {
            Ok(claims) => claims.additional_claims().roles(&self.role_claim),
            Err(e) => {
                warn!(target: "relay::provider", "failed to request user info: {e}");
                Roles::default()
            }
        }
    }
}
