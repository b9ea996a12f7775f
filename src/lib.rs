// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    absolute_paths_not_starting_with_crate,
    deprecated_in_future,
    noop_method_call,
    rust_2018_compatibility,
    rust_2018_idioms,
    rust_2021_compatibility,
    unreachable_code,
    unreachable_patterns,
    unused_import_braces,
    unused_lifetimes
)]

pub mod client {
    pub use rolegate_client::*;
}
pub mod relay {
    pub use rolegate_relay::*;
}
pub mod server {
    pub use rolegate_server::*;
}
pub mod types {
    pub use rolegate_type::*;
}
