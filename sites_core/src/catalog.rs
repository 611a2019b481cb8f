use std::collections::HashSet;
use std::rc::Rc;

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Config;
use crate::data::{CategoriesTable, Category, CategoryId, NewSite, Provenance, Seed, SiteEntry, SiteId, SitePatch};
use crate::error::ValidationError;
use crate::storage::{self, Storage};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Owns the list of sites: the built-in ones from the seed followed by the
/// user-added ones, in insertion order.
///
/// Only the user-added part is persisted, and only it can be changed. Every
/// change is written to storage before the method returns.
pub struct CatalogStore {
    storage: Rc<dyn Storage>,
    key: String,
    id_prefix: String,
    bulk_category: (CategoryId, String),
    seed: Seed,
    user_added: Vec<SiteEntry>,
}

/// The outcome of a bulk add.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct BulkReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl CatalogStore {
    /// Seeds the catalog and merges the user-added sites found in storage.
    /// Unreadable storage content is discarded; it never prevents opening.
    pub fn open(storage: Rc<dyn Storage>, seed: Seed, config: &Config) -> Self {
        let user_added = load_user_added(storage.as_ref(), &config.sites_key, &seed);
        info!(
            built_in = seed.sites().len(),
            user_added = user_added.len(),
            "opened site catalog"
        );
        CatalogStore {
            storage,
            key: config.sites_key.clone(),
            id_prefix: config.id_prefix.clone(),
            bulk_category: (
                CategoryId::new(config.bulk_category_id.clone()),
                config.bulk_category_name.clone(),
            ),
            seed,
            user_added,
        }
    }

    /// All sites, built-in first, each part in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &SiteEntry> {
        self.seed.sites().iter().chain(self.user_added.iter())
    }

    pub fn get(&self, id: &SiteId) -> Option<&SiteEntry> {
        self.list().find(|site| &site.id == id)
    }

    pub fn contains(&self, id: &SiteId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_built_in(&self, id: &SiteId) -> bool {
        self.seed.sites().iter().any(|site| &site.id == id)
    }

    pub fn built_in(&self) -> &[SiteEntry] {
        self.seed.sites()
    }

    pub fn user_added(&self) -> &[SiteEntry] {
        &self.user_added
    }

    pub fn len(&self) -> usize {
        self.seed.sites().len() + self.user_added.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> &CategoriesTable {
        self.seed.categories()
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.seed.categories().get(id)
    }

    /// Validates the site, stores it under a newly generated ID, and returns
    /// the stored entry. On a validation error nothing changes.
    pub fn add(&mut self, site: NewSite) -> Result<SiteEntry, ValidationError> {
        if let Err(err) = site.validate() {
            debug!(title = %site.title, url = %site.url, error = %err, "rejected new site");
            return Err(err);
        }

        let id = self.generate_id();
        let entry = site.into_entry(id, Provenance::UserAdded);
        self.user_added.push(entry.clone());
        info!(id = %entry.id, title = %entry.title, "added site");

        self.persist();
        Ok(entry)
    }

    /// Removes a user-added site. Returns false, changing nothing, if the ID
    /// is built-in or unknown.
    pub fn remove(&mut self, id: &SiteId) -> bool {
        if self.is_built_in(id) {
            warn!(%id, "refusing to remove built-in site");
            return false;
        }
        let Some(index) = self.user_added.iter().position(|site| &site.id == id) else {
            return false;
        };

        self.user_added.remove(index);
        info!(%id, "removed site");
        self.persist();
        true
    }

    /// Merges the patch into a user-added site. Returns `Ok(false)`, changing
    /// nothing, if the ID is built-in or unknown, and an error, also changing
    /// nothing, if the merged site would not be valid.
    pub fn update(&mut self, id: &SiteId, patch: SitePatch) -> Result<bool, ValidationError> {
        if self.is_built_in(id) {
            warn!(%id, "refusing to update built-in site");
            return Ok(false);
        }
        let Some(entry) = self.user_added.iter_mut().find(|site| &site.id == id) else {
            return Ok(false);
        };

        let mut updated = entry.clone();
        updated.apply(patch);
        updated.validate()?;
        *entry = updated;

        info!(%id, "updated site");
        self.persist();
        Ok(true)
    }

    /// Drops every user-added site and its stored record. Built-in sites stay.
    pub fn clear_user_added(&mut self) {
        let cleared = self.user_added.len();
        self.user_added.clear();
        if let Err(err) = self.storage.remove(&self.key) {
            error!(key = %self.key, error = %err, "could not erase stored sites");
        }
        info!(cleared, "cleared user-added sites");
    }

    /// Adds one site per URL, titled after the host name and filed under the
    /// bulk category. Blank entries are skipped; every other URL counts as
    /// either a success or a failure, and a failure never stops the batch.
    pub fn bulk_add<I, S>(&mut self, urls: I) -> BulkReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BulkReport::default();
        for url in urls {
            let url = url.as_ref().trim();
            if url.is_empty() {
                continue;
            }

            let parsed = match Url::parse(url) {
                Ok(parsed) => parsed,
                Err(err) => {
                    debug!(url, error = %err, "skipping unparseable url in bulk add");
                    report.failed += 1;
                    continue;
                }
            };
            let host = parsed.host_str().unwrap_or_default();
            let site = NewSite {
                title: title_from_host(host),
                url: url.to_string(),
                description: format!("Site: {host}"),
                category_id: self.bulk_category.0.clone(),
                category: self.bulk_category.1.clone(),
            };

            match self.add(site) {
                Ok(_) => report.succeeded += 1,
                Err(_) => report.failed += 1,
            }
        }
        info!(succeeded = report.succeeded, failed = report.failed, "bulk add finished");
        report
    }

    /// Like `bulk_add`, taking one URL per line.
    pub fn bulk_add_text(&mut self, text: &str) -> BulkReport {
        self.bulk_add(text.lines())
    }

    // Returns an ID that no site in the catalog uses, built-in sites included.
    fn generate_id(&self) -> SiteId {
        let mut rng = rand::thread_rng();
        loop {
            let suffix: String = (0..ID_SUFFIX_LEN)
                .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
                .collect();
            let id = SiteId::new(format!(
                "{}_{}_{}",
                self.id_prefix,
                Utc::now().timestamp_millis(),
                suffix
            ));
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn persist(&self) {
        if let Err(err) = storage::write_json(self.storage.as_ref(), &self.key, &self.user_added) {
            error!(key = %self.key, error = %err, "could not persist user-added sites");
        }
    }
}

/// "www.example.com" becomes "Example".
fn title_from_host(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn load_user_added(storage: &dyn Storage, key: &str, seed: &Seed) -> Vec<SiteEntry> {
    let Some(document) = storage::read_or_absent(storage, key) else {
        return Vec::new();
    };

    let records = match serde_json::from_str::<Value>(&document) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!(key, "stored sites are not an array, discarding them");
            storage::discard(storage, key);
            return Vec::new();
        }
        Err(err) => {
            warn!(key, error = %err, "stored sites are not valid JSON, discarding them");
            storage::discard(storage, key);
            return Vec::new();
        }
    };

    let mut taken: HashSet<SiteId> = seed.sites().iter().map(|site| site.id.clone()).collect();
    let mut sites = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let site: SiteEntry = match serde_json::from_value(record) {
            Ok(site) => site,
            Err(err) => {
                warn!(key, index, error = %err, "dropping malformed stored site");
                continue;
            }
        };
        if let Err(err) = site.validate() {
            warn!(key, index, id = %site.id, error = %err, "dropping invalid stored site");
            continue;
        }
        if !taken.insert(site.id.clone()) {
            warn!(key, index, id = %site.id, "dropping stored site with a taken id");
            continue;
        }
        sites.push(site);
    }
    sites
}
