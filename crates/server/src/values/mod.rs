// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

mod delete;
mod get;
mod list;
mod post;
mod put;

pub use delete::*;
pub use get::*;
pub use list::*;
pub use post::*;
pub use put::*;
