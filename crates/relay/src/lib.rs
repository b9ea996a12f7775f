// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]
#![forbid(unsafe_code)]

mod builder;
mod home;
mod origin;
mod provider;
mod redirect;

pub mod account;
pub mod actions;
pub mod session;

pub use builder::*;
pub use origin::RequestOrigin;
pub use provider::{OidcClient, Provider, RoleTokenResponse};
pub use redirect::{logout_url, AuthRedirect};
pub use session::{Authenticated, Sessions, User, COOKIE_NAME};

pub use openidconnect::url;
