// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Role, Roles};

use std::fmt;

/// An operation on the values resource.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// The caller holds none of the roles an [Operation] requires.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Denied(pub Operation);

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` requires one of the roles: {}",
            self.0,
            self.0.roles().join(", ")
        )
    }
}

impl std::error::Error for Denied {}

impl Operation {
    /// Roles allowed to perform the operation.
    pub const fn roles(&self) -> &'static [&'static str] {
        match self {
            Operation::List | Operation::Get => &[Role::ADMIN, Role::DEVELOPER, Role::GUEST],
            Operation::Create | Operation::Update => &[Role::ADMIN, Role::DEVELOPER],
            Operation::Delete => &[Role::ADMIN],
        }
    }

    /// Checks whether `roles` intersects the role whitelist of the operation.
    pub fn authorize(self, roles: &Roles) -> Result<(), Denied> {
        if roles.any_of(self.roles()) {
            Ok(())
        } else {
            Err(Denied(self))
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Operation::List => "list",
                Operation::Get => "get",
                Operation::Create => "create",
                Operation::Update => "update",
                Operation::Delete => "delete",
            }
        )
    }
}
