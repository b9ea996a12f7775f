// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{Entity, Result};

use std::ops::Deref;

use rolegate_type::Payload;

/// The `api/values` collection.
#[derive(Clone, Debug)]
#[repr(transparent)]
pub struct Values<'a>(Entity<'a>);

impl<'a> Deref for Values<'a> {
    type Target = Entity<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> Values<'a> {
    pub fn new(root: Entity<'a>) -> Self {
        Values(root.child("api/values"))
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.0.get_json()
    }

    /// Returns [None] if no value is stored under `id`.
    pub fn get(&self, id: i32) -> Result<Option<String>> {
        self.0
            .child(&id.to_string())
            .get_string()
            .map(|value| Some(value).filter(|v| !v.is_empty()))
    }

    pub fn create(&self, payload: &Payload) -> Result<()> {
        self.0.send_json("POST", payload)
    }

    pub fn update(&self, payload: &Payload) -> Result<()> {
        self.0.send_json("PUT", payload)
    }

    pub fn delete(&self, id: i32) -> Result<()> {
        self.0.child(&id.to_string()).delete()
    }
}
