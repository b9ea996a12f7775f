// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

mod memory;
mod oidc;

pub use memory::StaticVerifier;
pub use oidc::{Config as OidcConfig, Verifier as OidcVerifier};

use rolegate_type::{Operation, Roles};

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use axum::extract::rejection::{TypedHeaderRejection, TypedHeaderRejectionReason};
use axum::extract::{Extension, FromRequest, RequestParts};
use axum::headers::authorization::Bearer;
use axum::headers::Authorization;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{async_trait, TypedHeader};
use openidconnect::AccessToken;
use tracing::{debug, error};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    /// The token is not known to the verifier.
    Unknown,
    /// The verifier could not build a validation request.
    Configuration(String),
    /// The identity provider rejected the token.
    Rejected(String),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Unknown => write!(f, "unknown token"),
            VerifyError::Configuration(e) => write!(f, "configuration error: {e}"),
            VerifyError::Rejected(e) => write!(f, "token rejected: {e}"),
        }
    }
}

impl std::error::Error for VerifyError {}

/// Resolves a bearer token to the [Principal] it was issued to.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: AccessToken) -> Result<Principal, VerifyError>;
}

/// An authenticated caller and its role claim set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub roles: Roles,
}

impl Principal {
    /// Assert that the caller may perform `op`.
    pub fn authorize(&self, op: Operation) -> Result<(), Response> {
        op.authorize(&self.roles).map_err(|e| {
            debug!(target: "server::auth", subject = %self.subject, roles = %self.roles, "access denied: {e}");
            (StatusCode::FORBIDDEN, e.to_string()).into_response()
        })
    }
}

#[async_trait]
impl<B: Send> FromRequest<B> for Principal {
    type Rejection = Response;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization::<Bearer>(token)) =
            req.extract()
                .await
                .map_err(|e: TypedHeaderRejection| match e.reason() {
                    TypedHeaderRejectionReason::Missing => {
                        (StatusCode::UNAUTHORIZED, "Bearer token header missing").into_response()
                    }
                    _ => (StatusCode::UNAUTHORIZED, format!("Invalid bearer token header: {e}"))
                        .into_response(),
                })?;
        let token = AccessToken::new(token.token().into());

        let Extension(verifier) = Extension::<Arc<dyn Verifier>>::from_request(req)
            .await
            .map_err(|e| {
                error!(target: "server::auth", "token verifier extension missing");
                e.into_response()
            })?;

        verifier.verify(token).await.map_err(|e| {
            debug!(target: "server::auth", "failed to verify bearer token: {e}");
            (
                StatusCode::UNAUTHORIZED,
                format!("OpenID Connect credential validation failed: {e}"),
            )
                .into_response()
        })
    }
}

/// An [Operation] known at compile time.
pub trait Permission: Send + Sync + 'static {
    const OPERATION: Operation;
}

/// Marker types naming each [Operation] for [Authorized].
pub mod op {
    use super::{Operation, Permission};

    #[derive(Clone, Copy, Debug)]
    pub struct List;
    #[derive(Clone, Copy, Debug)]
    pub struct Get;
    #[derive(Clone, Copy, Debug)]
    pub struct Create;
    #[derive(Clone, Copy, Debug)]
    pub struct Update;
    #[derive(Clone, Copy, Debug)]
    pub struct Delete;

    impl Permission for List {
        const OPERATION: Operation = Operation::List;
    }
    impl Permission for Get {
        const OPERATION: Operation = Operation::Get;
    }
    impl Permission for Create {
        const OPERATION: Operation = Operation::Create;
    }
    impl Permission for Update {
        const OPERATION: Operation = Operation::Update;
    }
    impl Permission for Delete {
        const OPERATION: Operation = Operation::Delete;
    }
}

/// A [Principal] allowed to perform `P::OPERATION`.
///
/// Placed before body and path extractors, a denied caller gets `403`
/// whatever the rest of the request looks like.
#[derive(Clone, Debug)]
pub struct Authorized<P> {
    principal: Principal,
    permission: PhantomData<P>,
}

impl<P> Deref for Authorized<P> {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}

#[async_trait]
impl<B: Send, P: Permission> FromRequest<B> for Authorized<P> {
    type Rejection = Response;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request(req).await?;
        principal.authorize(P::OPERATION)?;
        Ok(Self {
            principal,
            permission: PhantomData,
        })
    }
}
