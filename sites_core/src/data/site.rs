use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::category::{Category, CategoryId};
use crate::error::ValidationError;

/// A unique ID that refers to a site entry. Unique across the built-in and
/// user-added parts of a catalog.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

/// Where a site entry came from. Only user-added entries can be changed
/// through the catalog.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum Provenance {
    /// Present when the catalog was seeded.
    BuiltIn,
    /// Created through `add` or `bulk_add`, or loaded from storage.
    #[default]
    UserAdded,
}

/// A link in the catalog. Serializes to the persisted record shape, which does
/// not carry the provenance.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub id: SiteId,
    pub title: String,
    /// An absolute URL.
    pub url: String,
    pub description: String,
    pub category_id: CategoryId,
    /// The name of the category, denormalized for display and sorting.
    pub category: String,
    #[serde(skip)]
    pub provenance: Provenance,
}

/// The data of a site entry that is about to be added; the catalog assigns the
/// ID.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct NewSite {
    pub title: String,
    pub url: String,
    pub description: String,
    pub category_id: CategoryId,
    pub category: String,
}

/// A partial update of a user-added entry. `None` fields are left as they are.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct SitePatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category: Option<String>,
}

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        SiteId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        SiteId::new(id)
    }
}

impl SiteEntry {
    pub fn is_built_in(&self) -> bool {
        self.provenance == Provenance::BuiltIn
    }

    /// Checks the rules every stored entry must follow.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.url, &self.category_id)
    }

    /// Merges the set fields of the patch into this entry. The ID and
    /// provenance are never touched.
    pub fn apply(&mut self, patch: SitePatch) {
        let SitePatch { title, url, description, category_id, category } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category_id) = category_id {
            self.category_id = category_id;
        }
        if let Some(category) = category {
            self.category = category;
        }
    }

    /// The host name of the URL, e.g. for showing next to the title.
    pub fn hostname(&self) -> Option<String> {
        Url::parse(&self.url).ok()?.host_str().map(str::to_string)
    }
}

impl NewSite {
    /// Creates the data of a site filed under the given category, filling in
    /// the denormalized category name.
    pub fn in_category(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        category: &Category,
    ) -> Self {
        NewSite {
            title: title.into(),
            url: url.into(),
            description: description.into(),
            category_id: category.id.clone(),
            category: category.name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.url, &self.category_id)
    }

    pub(crate) fn into_entry(self, id: SiteId, provenance: Provenance) -> SiteEntry {
        let NewSite { title, url, description, category_id, category } = self;
        SiteEntry { id, title, url, description, category_id, category, provenance }
    }
}

fn validate_fields(title: &str, url: &str, category_id: &CategoryId) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::MissingField("title"));
    }
    if url.is_empty() {
        return Err(ValidationError::MissingField("url"));
    }
    if category_id.as_str().is_empty() {
        return Err(ValidationError::MissingField("categoryId"));
    }
    // `Url::parse` has no base, so relative references are rejected here
    Url::parse(url).map_err(|err| ValidationError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    Ok(())
}
