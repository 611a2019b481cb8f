use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use proptest::prelude::*;
use sites_core::query;
use sites_core::{
    CatalogStore, CategoryFilter, CategoryId, Config, Criteria, FavoritesStore, MemoryStorage,
    NewSite, Seed, SiteId, SitePatch, SortKey,
};

fn valid_site() -> impl Strategy<Value = NewSite> {
    ("[A-Za-z][A-Za-z ]{0,15}", "[a-z]{1,10}\\.(com|org|io)", ".{0,20}", "c[0-3]").prop_map(
        |(title, host, description, category)| NewSite {
            title,
            url: format!("https://{host}/"),
            description,
            category_id: CategoryId::new(category.clone()),
            category,
        },
    )
}

fn invalid_site() -> impl Strategy<Value = NewSite> {
    prop_oneof![
        valid_site().prop_map(|site| NewSite { title: String::new(), ..site }),
        valid_site().prop_map(|site| NewSite { url: String::new(), ..site }),
        (valid_site(), "[a-z ]{1,12}").prop_map(|(site, url)| NewSite { url, ..site }),
        valid_site().prop_map(|site| NewSite { category_id: CategoryId::new(""), ..site }),
    ]
}

fn open_catalog() -> CatalogStore {
    CatalogStore::open(Rc::new(MemoryStorage::new()), Seed::default(), &Config::default())
}

fn any_criteria() -> impl Strategy<Value = Criteria> {
    (
        "[a-z]{0,3}",
        prop_oneof![Just(CategoryFilter::All), "c[0-3]".prop_map(|c| CategoryFilter::parse(&c))],
        any::<bool>(),
        prop_oneof![Just(SortKey::Title), Just(SortKey::Category), Just(SortKey::FavoritesFirst)],
    )
        .prop_map(|(search, category, favorites_only, sort)| Criteria {
            search,
            category,
            favorites_only,
            sort,
        })
}

proptest! {
    #[test]
    fn add_grows_by_one_with_a_fresh_id(sites in prop::collection::vec(valid_site(), 1..8)) {
        let mut catalog = open_catalog();
        for site in sites {
            let before: HashSet<SiteId> = catalog.list().map(|s| s.id.clone()).collect();
            let added = catalog.add(site).unwrap();
            prop_assert_eq!(catalog.len(), before.len() + 1);
            prop_assert!(!before.contains(&added.id));
            prop_assert_eq!(catalog.list().filter(|s| s.id == added.id).count(), 1);
        }
    }

    #[test]
    fn invalid_add_never_changes_size(site in invalid_site()) {
        let mut catalog = open_catalog();
        let before = catalog.len();
        prop_assert!(catalog.add(site).is_err());
        prop_assert_eq!(catalog.len(), before);
    }

    #[test]
    fn built_in_sites_are_immutable(title in "[A-Za-z]{1,10}") {
        let mut catalog = open_catalog();
        let built_in = catalog.built_in().to_vec();
        for site in &built_in {
            prop_assert!(!catalog.remove(&site.id));
            let patch = SitePatch { title: Some(title.clone()), ..Default::default() };
            prop_assert_eq!(catalog.update(&site.id, patch), Ok(false));
        }
        prop_assert_eq!(catalog.built_in(), &built_in[..]);
    }

    #[test]
    fn removed_sites_leave_the_listing(sites in prop::collection::vec(valid_site(), 1..6), pick in any::<prop::sample::Index>()) {
        let mut catalog = open_catalog();
        let ids: Vec<SiteId> = sites.into_iter().map(|site| catalog.add(site).unwrap().id).collect();
        let target = pick.get(&ids).clone();
        prop_assert!(catalog.remove(&target));
        prop_assert!(catalog.list().all(|site| site.id != target));
        prop_assert_eq!(catalog.user_added().len(), ids.len() - 1);
    }

    #[test]
    fn favorites_follow_add_and_remove(id in "[a-z0-9]{1,8}", other in "[A-Z]{1,8}") {
        let mut favorites = FavoritesStore::open(Rc::new(MemoryStorage::new()), &Config::default());
        let id = SiteId::new(id);
        favorites.add(id.clone());
        prop_assert!(favorites.is_favorite(&id));

        let snapshot = favorites.list().clone();
        favorites.remove(&SiteId::new(other));
        prop_assert_eq!(favorites.list(), &snapshot);

        favorites.remove(&id);
        prop_assert!(!favorites.is_favorite(&id));
    }

    #[test]
    fn filter_respects_every_criterion(
        sites in prop::collection::vec(valid_site(), 0..10),
        favorite_picks in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
        criteria in any_criteria(),
    ) {
        let mut catalog = open_catalog();
        for site in sites {
            catalog.add(site).unwrap();
        }
        let all: Vec<_> = catalog.list().cloned().collect();
        let favorites: BTreeSet<SiteId> =
            favorite_picks.iter().map(|pick| pick.get(&all).id.clone()).collect();

        let first = query::filter(&all, &favorites, &criteria);
        let second = query::filter(&all, &favorites, &criteria);
        prop_assert_eq!(&first, &second);

        let term = criteria.search.to_lowercase();
        for site in &first {
            prop_assert!(
                site.title.to_lowercase().contains(&term)
                    || site.description.to_lowercase().contains(&term)
            );
            if let CategoryFilter::Only(id) = &criteria.category {
                prop_assert_eq!(&site.category_id, id);
            }
            if criteria.favorites_only {
                prop_assert!(favorites.contains(&site.id));
            }
        }

        let open_criteria = Criteria { sort: criteria.sort, ..Default::default() };
        prop_assert_eq!(query::filter(&all, &favorites, &open_criteria).len(), all.len());
    }
}
