// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Whitespace,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty role name"),
            ParseError::Whitespace => write!(f, "whitespace in role name"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A role name assigned to a principal by the identity provider.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const DEVELOPER: &'static str = "developer";
    pub const GUEST: &'static str = "guest";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Role {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Err(ParseError::Empty)
        } else if s.contains(char::is_whitespace) {
            Err(ParseError::Whitespace)
        } else {
            Ok(Self(s.into()))
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role claim set of an authenticated principal.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roles(BTreeSet<Role>);

impl Roles {
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.as_str() == role)
    }

    /// Returns `true` if at least one of `roles` is held.
    pub fn any_of(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.contains(role))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Roles {
    type Err = ParseError;

    /// Parses a comma-separated role list, e.g. `admin,developer`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Role::from_str)
            .collect()
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut roles = self.0.iter();
        if let Some(first) = roles.next() {
            write!(f, "{first}")?;
            for role in roles {
                write!(f, ",{role}")?;
            }
        }
        Ok(())
    }
}
