// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

mod callback;
mod claims;
mod login;
mod logout;

pub use callback::*;
pub use claims::*;
pub use login::*;
pub use logout::*;
