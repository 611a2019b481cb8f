pub mod category;
pub mod seed;
pub mod site;

pub use category::{CategoriesTable, Category, CategoryId};
pub use seed::Seed;
pub use site::{NewSite, Provenance, SiteEntry, SiteId, SitePatch};
