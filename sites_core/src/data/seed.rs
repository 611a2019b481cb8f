use std::collections::HashSet;

use tracing::warn;

use super::category::{CategoriesTable, Category};
use super::site::{NewSite, Provenance, SiteEntry, SiteId};

/// The built-in part of a catalog: the category table and the sites present
/// when the catalog is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    categories: CategoriesTable,
    sites: Vec<SiteEntry>,
}

impl Seed {
    /// Builds a seed, tagging every site as built-in. A site whose ID was
    /// already used is skipped.
    pub fn new(
        categories: CategoriesTable,
        sites: impl IntoIterator<Item = (SiteId, NewSite)>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut built_in = Vec::new();
        for (id, site) in sites {
            if !seen.insert(id.clone()) {
                warn!(%id, "skipping built-in site with a repeated id");
                continue;
            }
            built_in.push(site.into_entry(id, Provenance::BuiltIn));
        }
        Seed { categories, sites: built_in }
    }

    pub fn categories(&self) -> &CategoriesTable {
        &self.categories
    }

    pub fn sites(&self) -> &[SiteEntry] {
        &self.sites
    }
}

impl Default for Seed {
    /// The categories and links the directory ships with.
    fn default() -> Self {
        let categories = CategoriesTable::new([
            Category::new("3f1c2a5e-8b7d-4e21-9a0c-5d6e7f8a9b01", "Ferramentas", "#3b82f6"),
            Category::new("7a2b9c4d-1e3f-4a5b-8c6d-0e1f2a3b4c02", "Educação", "#10b981"),
            Category::new("c5d6e7f8-9a0b-4c1d-2e3f-4a5b6c7d8e03", "Design", "#ec4899"),
            Category::new("1b2c3d4e-5f6a-4b7c-8d9e-0f1a2b3c4d04", "Programação", "#8b5cf6"),
            Category::new("e8f9a0b1-c2d3-4e5f-6a7b-8c9d0e1f2a05", "Produtividade", "#f59e0b"),
            Category::new("9d530a41-510a-4f03-9f63-140f5c377761", "Outros", "#64748b"),
        ]);

        let ordered: Vec<Category> = categories.iter().cloned().collect();
        let sites = [
            ("0c6a9f52-4d1e-4b8a-9e3f-1a2b3c4d5e01", "Remove.bg", "https://www.remove.bg", "Remove o fundo de imagens automaticamente.", 0),
            ("1d7b0a63-5e2f-4c9b-8f40-2b3c4d5e6f02", "TinyPNG", "https://tinypng.com", "Comprime imagens PNG e JPEG sem perda visível.", 0),
            ("2e8c1b74-6f30-4d0c-9a51-3c4d5e6f7a03", "Khan Academy", "https://www.khanacademy.org", "Cursos gratuitos de matemática, ciências e muito mais.", 1),
            ("3f9d2c85-7041-4e1d-8b62-4d5e6f7a8b04", "Duolingo", "https://www.duolingo.com", "Aprenda idiomas com lições curtas.", 1),
            ("40ae3d96-8152-4f2e-9c73-5e6f7a8b9c05", "Figma", "https://www.figma.com", "Ferramenta colaborativa de design de interfaces.", 2),
            ("51bf4ea7-9263-403f-8d84-6f7a8b9c0d06", "Coolors", "https://coolors.co", "Gerador de paletas de cores.", 2),
            ("62c05fb8-a374-4140-9e95-7a8b9c0d1e07", "MDN Web Docs", "https://developer.mozilla.org", "Documentação de referência para tecnologias web.", 3),
            ("73d160c9-b485-4251-8fa6-8b9c0d1e2f08", "Regex101", "https://regex101.com", "Teste e depure expressões regulares.", 3),
            ("84e271da-c596-4362-90b7-9c0d1e2f3a09", "Notion", "https://www.notion.so", "Notas, tarefas e wikis em um só lugar.", 4),
            ("95f382eb-d6a7-4473-a1c8-0d1e2f3a4b10", "Excalidraw", "https://excalidraw.com", "Quadro branco virtual para esboços.", 4),
            ("a60493fc-e7b8-4584-b2d9-1e2f3a4b5c11", "Wayback Machine", "https://web.archive.org", "Versões antigas de páginas da web.", 5),
        ]
        .map(|(id, title, url, description, category_index)| {
            let category = &ordered[category_index];
            (SiteId::new(id), NewSite::in_category(title, url, description, category))
        });

        Seed::new(categories, sites)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_seed_is_consistent() {
        let seed = Seed::default();
        assert!(!seed.sites().is_empty());
        for site in seed.sites() {
            assert!(site.is_built_in());
            assert!(site.validate().is_ok(), "{} should be a valid entry", site.id);
            let category = seed.categories().get(&site.category_id).unwrap();
            assert_eq!(category.name, site.category);
        }
    }

    #[test]
    fn repeated_site_ids_are_skipped() {
        let site = NewSite { title: "A".to_string(), ..Default::default() };
        let seed = Seed::new(
            CategoriesTable::default(),
            [(SiteId::new("b1"), site.clone()), (SiteId::new("b1"), site)],
        );
        assert_eq!(seed.sites().len(), 1);
    }
}
