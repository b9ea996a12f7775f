// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]
#![forbid(unsafe_code)]

mod builder;

pub mod auth;
pub mod store;
pub mod values;

pub use auth::{
    op, Authorized, OidcConfig, OidcVerifier, Permission, Principal, StaticVerifier, Verifier,
    VerifyError,
};
pub use builder::*;
pub use store::Store;

pub use openidconnect::url;
