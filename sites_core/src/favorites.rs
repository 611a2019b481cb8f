use std::collections::BTreeSet;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::data::SiteId;
use crate::storage::{self, Storage};

/// The set of favorited site IDs. Favorites do not have to refer to a site
/// that is currently in the catalog.
pub struct FavoritesStore {
    storage: Rc<dyn Storage>,
    key: String,
    favorites: BTreeSet<SiteId>,
}

impl FavoritesStore {
    pub fn open(storage: Rc<dyn Storage>, config: &Config) -> Self {
        let favorites = load_favorites(storage.as_ref(), &config.favorites_key);
        debug!(count = favorites.len(), "opened favorites");
        FavoritesStore { storage, key: config.favorites_key.clone(), favorites }
    }

    pub fn list(&self) -> &BTreeSet<SiteId> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &SiteId) -> bool {
        self.favorites.contains(id)
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Marks the site as a favorite. Returns whether the set changed; an empty
    /// ID is ignored.
    pub fn add(&mut self, id: SiteId) -> bool {
        if id.as_str().is_empty() {
            return false;
        }
        let changed = self.favorites.insert(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Unmarks the site. Returns whether the set changed.
    pub fn remove(&mut self, id: &SiteId) -> bool {
        let changed = self.favorites.remove(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Flips the favorite status of the site and returns the new status.
    pub fn toggle(&mut self, id: SiteId) -> bool {
        if self.is_favorite(&id) {
            self.remove(&id);
            false
        } else {
            self.add(id)
        }
    }

    pub fn clear(&mut self) {
        self.favorites.clear();
        if let Err(err) = self.storage.remove(&self.key) {
            error!(key = %self.key, error = %err, "could not erase stored favorites");
        }
        info!("cleared favorites");
    }

    fn persist(&self) {
        if let Err(err) = storage::write_json(self.storage.as_ref(), &self.key, &self.favorites) {
            error!(key = %self.key, error = %err, "could not persist favorites");
        }
    }
}

fn load_favorites(storage: &dyn Storage, key: &str) -> BTreeSet<SiteId> {
    let Some(document) = storage::read_or_absent(storage, key) else {
        return BTreeSet::new();
    };

    match serde_json::from_str::<Value>(&document) {
        Ok(Value::Array(ids)) => ids
            .into_iter()
            .filter_map(|id| match id {
                Value::String(id) if !id.is_empty() => Some(SiteId::new(id)),
                other => {
                    warn!(key, value = %other, "dropping non-string favorite");
                    None
                }
            })
            .collect(),
        Ok(_) => {
            warn!(key, "stored favorites are not an array, discarding them");
            storage::discard(storage, key);
            BTreeSet::new()
        }
        Err(err) => {
            warn!(key, error = %err, "stored favorites are not valid JSON, discarding them");
            storage::discard(storage, key);
            BTreeSet::new()
        }
    }
}
