// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]
#![deny(unsafe_code)]

pub mod claims;
pub mod policy;
pub mod role;

mod payload;

pub use claims::{RoleClaims, DEFAULT_ROLE_CLAIM};
pub use payload::*;
pub use policy::{Denied, Operation};
pub use role::{ParseError as ParseRoleError, Role, Roles};
