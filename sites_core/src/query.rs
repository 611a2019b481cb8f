//! Filtering and ordering of a catalog snapshot for display.
//!
//! Everything here is a pure function of its arguments: the same catalog,
//! favorites and criteria always give the same result, and nothing is
//! modified.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::data::{CategoriesTable, Category, CategoryId, SiteEntry, SiteId};

/// The value of the category selector that matches every category.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum SortKey {
    /// By title.
    #[default]
    Title,
    /// By category name. Sites in the same category keep their catalog order.
    Category,
    /// Favorites before the rest, each group by title.
    FavoritesFirst,
}

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Criteria {
    /// Matched case-insensitively against the title and the description. The
    /// empty string matches everything.
    pub search: String,
    pub category: CategoryFilter,
    pub favorites_only: bool,
    pub sort: SortKey,
}

/// A filtered view together with the size of the catalog it came from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct QueryView<'a> {
    pub sites: Vec<&'a SiteEntry>,
    pub total: usize,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UnknownSortKey(pub String);

impl CategoryFilter {
    /// Reads a selector value, where `"all"` is the wildcard.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(CategoryId::new(value))
        }
    }

    fn matches(&self, site: &SiteEntry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => &site.category_id == id,
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    /// Accepts the selector values of the listing page.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" | "title" => Ok(SortKey::Title),
            "category" => Ok(SortKey::Category),
            "favorites" => Ok(SortKey::FavoritesFirst),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

impl Criteria {
    pub fn search(term: impl Into<String>) -> Self {
        Criteria { search: term.into(), ..Default::default() }
    }
}

impl QueryView<'_> {
    pub fn shown(&self) -> usize {
        self.sites.len()
    }
}

/// Returns the sites matching every criterion, in the requested order.
pub fn filter<'a, I>(sites: I, favorites: &BTreeSet<SiteId>, criteria: &Criteria) -> Vec<&'a SiteEntry>
where
    I: IntoIterator<Item = &'a SiteEntry>,
{
    let term = criteria.search.to_lowercase();
    let mut matched: Vec<&SiteEntry> = sites
        .into_iter()
        .filter(|site| {
            term.is_empty()
                || site.title.to_lowercase().contains(&term)
                || site.description.to_lowercase().contains(&term)
        })
        .filter(|site| criteria.category.matches(site))
        .filter(|site| !criteria.favorites_only || favorites.contains(&site.id))
        .collect();

    // stable, so equal keys keep catalog order
    match criteria.sort {
        SortKey::Title => matched.sort_by(|a, b| collate(&a.title, &b.title)),
        SortKey::Category => matched.sort_by(|a, b| collate(&a.category, &b.category)),
        SortKey::FavoritesFirst => matched.sort_by(|a, b| {
            let a_favorite = favorites.contains(&a.id);
            let b_favorite = favorites.contains(&b.id);
            b_favorite.cmp(&a_favorite).then_with(|| collate(&a.title, &b.title))
        }),
    }
    matched
}

/// Like `filter`, also reporting how many sites there were to begin with.
pub fn view<'a, I>(sites: I, favorites: &BTreeSet<SiteId>, criteria: &Criteria) -> QueryView<'a>
where
    I: IntoIterator<Item = &'a SiteEntry>,
{
    let sites: Vec<&SiteEntry> = sites.into_iter().collect();
    let total = sites.len();
    QueryView { sites: filter(sites, favorites, criteria), total }
}

/// The number of sites in each category, in category table order. Categories
/// without sites are included with a count of zero.
pub fn category_counts<'c, 'a, I>(categories: &'c CategoriesTable, sites: I) -> Vec<(&'c Category, usize)>
where
    I: IntoIterator<Item = &'a SiteEntry>,
{
    let mut counts: Vec<(&Category, usize)> = categories.iter().map(|category| (category, 0)).collect();
    for site in sites {
        if let Some((_, count)) = counts.iter_mut().find(|(category, _)| category.id == site.category_id) {
            *count += 1;
        }
    }
    counts
}

/// Orders strings the way a reader expects: accents and case only decide
/// between strings that are otherwise equal.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

fn collation_key(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::{NewSite, Provenance};

    fn site(id: &str, title: &str, description: &str, category_id: &str, category: &str) -> SiteEntry {
        NewSite {
            title: title.to_string(),
            url: format!("https://{id}.example"),
            description: description.to_string(),
            category_id: CategoryId::new(category_id),
            category: category.to_string(),
        }
        .into_entry(SiteId::new(id), Provenance::UserAdded)
    }

    fn sample() -> Vec<SiteEntry> {
        vec![
            site("1", "figma", "Design de interfaces", "design", "Design"),
            site("2", "Ábaco", "Calculadora online", "tools", "Ferramentas"),
            site("3", "Notion", "Notas e tarefas", "prod", "Produtividade"),
            site("4", "Coolors", "Paletas de cores", "design", "Design"),
            site("5", "Zeal", "Documentação offline", "tools", "Ferramentas"),
        ]
    }

    fn titles(sites: &[&SiteEntry]) -> Vec<String> {
        sites.iter().map(|site| site.title.clone()).collect()
    }

    #[test]
    fn collation_ignores_case_and_accents_first() {
        assert_eq!(collate("Ábaco", "Coolors"), Ordering::Less);
        assert_eq!(collate("figma", "Notion"), Ordering::Less);
        assert_eq!(collate("abaco", "Ábaco"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn empty_search_and_all_categories_return_everything() {
        let sites = sample();
        let result = filter(&sites, &BTreeSet::new(), &Criteria::default());
        assert_eq!(titles(&result), vec!["Ábaco", "Coolors", "figma", "Notion", "Zeal"]);
    }

    #[test]
    fn search_matches_title_or_description() {
        let sites = sample();
        let result = filter(&sites, &BTreeSet::new(), &Criteria::search("NOTA"));
        assert_eq!(titles(&result), vec!["Notion"]);
        let result = filter(&sites, &BTreeSet::new(), &Criteria::search("cores"));
        assert_eq!(titles(&result), vec!["Coolors"]);
    }

    #[test]
    fn category_filter_is_exact() {
        let sites = sample();
        let criteria = Criteria { category: CategoryFilter::parse("design"), ..Default::default() };
        assert_eq!(titles(&filter(&sites, &BTreeSet::new(), &criteria)), vec!["Coolors", "figma"]);
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
    }

    #[test]
    fn favorites_only_and_favorites_first() {
        let sites = sample();
        let favorites: BTreeSet<_> = [SiteId::new("5"), SiteId::new("3"), SiteId::new("gone")].into();

        let only = Criteria { favorites_only: true, ..Default::default() };
        assert_eq!(titles(&filter(&sites, &favorites, &only)), vec!["Notion", "Zeal"]);

        let first = Criteria { sort: SortKey::FavoritesFirst, ..Default::default() };
        assert_eq!(
            titles(&filter(&sites, &favorites, &first)),
            vec!["Notion", "Zeal", "Ábaco", "Coolors", "figma"]
        );
    }

    #[test]
    fn category_sort_keeps_catalog_order_within_a_category() {
        let sites = sample();
        let criteria = Criteria { sort: SortKey::Category, ..Default::default() };
        assert_eq!(
            titles(&filter(&sites, &BTreeSet::new(), &criteria)),
            vec!["figma", "Coolors", "Ábaco", "Zeal", "Notion"]
        );
    }

    #[test]
    fn sort_keys_parse_from_selector_values() {
        assert_eq!("name".parse::<SortKey>(), Ok(SortKey::Title));
        assert_eq!("category".parse::<SortKey>(), Ok(SortKey::Category));
        assert_eq!("favorites".parse::<SortKey>(), Ok(SortKey::FavoritesFirst));
        assert_eq!("date".parse::<SortKey>(), Err(UnknownSortKey("date".to_string())));
    }

    #[test]
    fn view_reports_totals() {
        let sites = sample();
        let result = view(&sites, &BTreeSet::new(), &Criteria::search("zzz"));
        assert_eq!(result.shown(), 0);
        assert_eq!(result.total, 5);
    }

    #[test]
    fn counts_cover_every_category() {
        let sites = sample();
        let categories = CategoriesTable::new([
            Category::new("design", "Design", "#1"),
            Category::new("tools", "Ferramentas", "#2"),
            Category::new("empty", "Vazia", "#3"),
        ]);
        let counts: Vec<_> = category_counts(&categories, &sites)
            .into_iter()
            .map(|(category, count)| (category.id.as_str().to_string(), count))
            .collect();
        assert_eq!(
            counts,
            vec![("design".to_string(), 2), ("tools".to_string(), 2), ("empty".to_string(), 0)]
        );
    }
}
