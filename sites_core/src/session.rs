use std::rc::Rc;

use crate::access::{AccessGate, CredentialVerifier};
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::data::Seed;
use crate::error::AccessDenied;
use crate::favorites::FavoritesStore;
use crate::query::{self, Criteria, QueryView};
use crate::storage::Storage;

/// Everything one user session works with, loaded from a single storage.
///
/// Consumers receive the stores through this value; there is no global
/// instance.
pub struct Session {
    catalog: CatalogStore,
    favorites: FavoritesStore,
    access: AccessGate,
}

impl Session {
    pub fn open(
        storage: Rc<dyn Storage>,
        seed: Seed,
        config: &Config,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Self {
        Session {
            catalog: CatalogStore::open(storage.clone(), seed, config),
            favorites: FavoritesStore::open(storage.clone(), config),
            access: AccessGate::open(storage, config, verifier),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    pub fn access(&self) -> &AccessGate {
        &self.access
    }

    pub fn access_mut(&mut self) -> &mut AccessGate {
        &mut self.access
    }

    /// The catalog for the admin view, available only to a privileged session.
    pub fn admin_catalog(&mut self) -> Result<&mut CatalogStore, AccessDenied> {
        self.access.require_admin()?;
        Ok(&mut self.catalog)
    }

    /// The listing for the given criteria.
    pub fn view(&self, criteria: &Criteria) -> QueryView<'_> {
        query::view(self.catalog.list(), self.favorites.list(), criteria)
    }
}
