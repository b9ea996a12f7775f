// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: AGPL-3.0-only

use super::{values, Store, Verifier};

use std::sync::Arc;

use axum::routing::{get, IntoMakeService};
use axum::{Extension, Router};

/// Path of the values collection.
pub const VALUES_URI: &str = "/api/values";

/// Values API server builder.
pub struct Builder {
    verifier: Arc<dyn Verifier>,
    store: Option<Store>,
}

impl Builder {
    /// Constructs a new [Builder] authenticating callers with `verifier`.
    pub fn new(verifier: impl Verifier + 'static) -> Self {
        Self {
            verifier: Arc::new(verifier),
            store: None,
        }
    }

    /// Serve `store` instead of a freshly seeded one.
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the values API router.
    ///
    /// Unless a store was set with [Builder::store], the store is seeded here,
    /// once for the lifetime of the returned router.
    pub fn build(self) -> Router {
        let store = self.store.unwrap_or_else(Store::seeded);
        Router::new()
            .route(
                VALUES_URI,
                get(values::list).post(values::post).put(values::put),
            )
            .route(
                &format!("{VALUES_URI}/:id"),
                get(values::get).delete(values::delete),
            )
            .layer(Extension(Arc::new(store)))
            .layer(Extension(self.verifier))
    }

    /// Builds the values API and returns it as a make-service for [axum::Server].
    pub fn build_service(self) -> IntoMakeService<Router> {
        self.build().into_make_service()
    }
}
