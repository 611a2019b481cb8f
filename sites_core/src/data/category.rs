use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque identifier of a category. Sites refer to their category by this
/// ID.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Category {
    pub id: CategoryId,
    /// The display name of the category, e.g. "Ferramentas".
    pub name: String,
    /// A display token used by the presentation layer, e.g. "#3b82f6".
    pub color: String,
}

/// The fixed, read-only set of categories, in display order.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct CategoriesTable {
    categories: Vec<Category>,
}

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        CategoryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Category { id: CategoryId::new(id), name: name.into(), color: color.into() }
    }
}

impl CategoriesTable {
    /// Builds the table, keeping the first category for every repeated ID.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut table = CategoriesTable::default();
        for category in categories {
            if table.get(&category.id).is_none() {
                table.categories.push(category);
            }
        }
        table
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
