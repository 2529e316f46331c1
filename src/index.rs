//! Groups collected [`Article`]s by tag and by category and builds the
//! `{name, count, slug}` index for each grouping.
//!
//! Tags and categories differ only in how a group's name becomes a path
//! segment: tags go through [`derive_tag_slug`], categories use their raw
//! name ([`category_path_segment`]). Neither detects collisions, so two tags
//! whose slugs coincide write to the same output directory and the group
//! written last wins. [`Taxonomy::slug_collisions`] reports such cases.

use crate::article::{Article, ArticleRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the per-group listing data file.
pub const ARTICLES_FILE_NAME: &str = "articles.json";

/// The two ways articles are grouped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Tag,
    Category,
}

impl Kind {
    /// The directory (relative to the docs directory) holding this kind's
    /// outputs.
    pub const fn directory_name(self) -> &'static str {
        match self {
            Kind::Tag => "tags",
            Kind::Category => "categories",
        }
    }

    /// The file name of this kind's top-level index.
    pub const fn index_file_name(self) -> &'static str {
        match self {
            Kind::Tag => "tags.json",
            Kind::Category => "categories.json",
        }
    }

    /// Maps a group name to the path segment (and `slug`) used for it.
    pub fn path_segment(self, name: &str) -> String {
        match self {
            Kind::Tag => derive_tag_slug(name),
            Kind::Category => category_path_segment(name),
        }
    }
}

/// Derives a tag's slug: lowercase, with spaces, `.`, and `&` replaced by
/// `-`. This is plain character substitution, so distinct tags may share a
/// slug (`Node.js` and `node js` both become `node-js`).
pub fn derive_tag_slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '.' | '&' => '-',
            _ => c,
        })
        .collect()
}

/// Categories use their raw name as path segment.
pub fn category_path_segment(name: &str) -> String {
    name.to_owned()
}

/// One entry of `tags/tags.json` or `categories/categories.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub count: usize,
    pub slug: String,
}

/// The articles sharing one tag or one category.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// The tag or category as written in the articles' metadata.
    pub name: String,

    /// The directory name under [`Kind::directory_name`] for this group.
    pub path_segment: String,

    /// Sorted by date, most recent first.
    pub articles: Vec<ArticleRecord>,
}

impl Group {
    /// The site-absolute path the listing page fetches its data from. It
    /// names the same file the writer produces for this group.
    pub fn fetch_path(&self, kind: Kind) -> String {
        format!(
            "/{}/{}/{}",
            kind.directory_name(),
            self.path_segment,
            ARTICLES_FILE_NAME
        )
    }
}

/// All groups of one [`Kind`] together with their index.
#[derive(Clone, Debug, PartialEq)]
pub struct Taxonomy {
    pub kind: Kind,

    /// In order of first appearance.
    pub groups: Vec<Group>,

    /// Sorted by count, largest first; equal counts keep first-appearance
    /// order.
    pub index: Vec<IndexEntry>,
}

impl Taxonomy {
    /// Groups `articles` by this kind's key. An article contributes to one
    /// group per tag, or to exactly one group for its category.
    pub fn build(kind: Kind, articles: &[Article]) -> Taxonomy {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for article in articles {
            let keys: Vec<&str> = match kind {
                Kind::Tag => article.tags.iter().map(String::as_str).collect(),
                Kind::Category => vec![article.category.as_str()],
            };
            for key in keys {
                let position = *positions.entry(key).or_insert_with(|| {
                    groups.push(Group {
                        name: key.to_owned(),
                        path_segment: kind.path_segment(key),
                        articles: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[position].articles.push(ArticleRecord::from(article));
            }
        }

        for group in groups.iter_mut() {
            group.articles.sort_by(|a, b| b.date.cmp(&a.date));
        }

        // Counts come straight from the groups so that they can't drift from
        // the listings written next to them.
        let mut index: Vec<IndexEntry> = groups
            .iter()
            .map(|group| IndexEntry {
                name: group.name.clone(),
                count: group.articles.len(),
                slug: group.path_segment.clone(),
            })
            .collect();
        index.sort_by(|a, b| b.count.cmp(&a.count));

        Taxonomy {
            kind,
            groups,
            index,
        }
    }

    /// Returns every path segment shared by more than one group, together
    /// with the names of the groups sharing it (in first-appearance order).
    pub fn slug_collisions(&self) -> Vec<(String, Vec<String>)> {
        let mut by_segment: Vec<(String, Vec<String>)> = Vec::new();
        for group in &self.groups {
            match by_segment
                .iter()
                .position(|(segment, _)| *segment == group.path_segment)
            {
                Some(i) => by_segment[i].1.push(group.name.clone()),
                None => by_segment
                    .push((group.path_segment.clone(), vec![group.name.clone()])),
            }
        }
        by_segment.retain(|(_, names)| names.len() > 1);
        by_segment
    }
}

/// Groups `articles` by tag.
pub fn index_by_tag(articles: &[Article]) -> Taxonomy {
    Taxonomy::build(Kind::Tag, articles)
}

/// Groups `articles` by category.
pub fn index_by_category(articles: &[Article]) -> Taxonomy {
    Taxonomy::build(Kind::Category, articles)
}

#[cfg(test)]
mod test {
    use super::*;

    fn article(title: &str, date: &str, category: &str, tags: &[&str]) -> Article {
        Article {
            title: title.to_owned(),
            date: date.to_owned(),
            category: category.to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            reading_time: 1,
            pin: false,
            url: format!("/posts/{}/", title),
            content: String::new(),
        }
    }

    fn fixture() -> Vec<Article> {
        vec![
            article("a", "2024-01-01", "tech", &["rust", "web"]),
            article("b", "2024-03-01", "life", &["rust"]),
            article("c", "2023-12-31", "tech", &["web", "rust"]),
            article("d", "2024-02-01", "tech", &[]),
        ]
    }

    fn titles(group: &Group) -> Vec<&str> {
        group.articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_derive_tag_slug() {
        assert_eq!(derive_tag_slug("Rust"), "rust");
        assert_eq!(derive_tag_slug("Node.js"), "node-js");
        assert_eq!(derive_tag_slug("Tips & Tricks"), "tips---tricks");
        assert_eq!(derive_tag_slug("机器学习"), "机器学习");
    }

    #[test]
    fn test_derive_tag_slug_collides() {
        // Substitution is not injective: these pairs share an output
        // directory.
        assert_eq!(derive_tag_slug("a.b"), derive_tag_slug("A B"));
        assert_eq!(derive_tag_slug("C&"), derive_tag_slug("c-"));
        assert_eq!(derive_tag_slug("C&"), "c-");

        // `#` is not substituted, so `C#` keeps its own slug and only
        // collides with tags that lowercase to `c#`.
        assert_eq!(derive_tag_slug("C#"), "c#");
        assert_ne!(derive_tag_slug("C#"), derive_tag_slug("C-"));
        assert_eq!(derive_tag_slug("C#"), derive_tag_slug("c#"));
    }

    #[test]
    fn test_category_path_segment_is_raw() {
        assert_eq!(category_path_segment("Deep Learning"), "Deep Learning");
        assert_eq!(category_path_segment("随笔"), "随笔");
    }

    #[test]
    fn test_index_by_tag() {
        let taxonomy = index_by_tag(&fixture());
        assert_eq!(
            taxonomy.index,
            vec![
                IndexEntry {
                    name: "rust".to_owned(),
                    count: 3,
                    slug: "rust".to_owned(),
                },
                IndexEntry {
                    name: "web".to_owned(),
                    count: 2,
                    slug: "web".to_owned(),
                },
            ]
        );

        let rust = &taxonomy.groups[0];
        assert_eq!(rust.name, "rust");
        assert_eq!(titles(rust), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_index_by_category() {
        let taxonomy = index_by_category(&fixture());
        let names: Vec<(&str, usize)> = taxonomy
            .index
            .iter()
            .map(|e| (e.name.as_str(), e.count))
            .collect();
        assert_eq!(names, vec![("tech", 3), ("life", 1)]);
        assert_eq!(titles(&taxonomy.groups[0]), vec!["d", "a", "c"]);
        assert!(taxonomy.index.iter().all(|e| e.slug == e.name));
    }

    #[test]
    fn test_counts_match_groups() {
        let articles = fixture();
        for taxonomy in [index_by_tag(&articles), index_by_category(&articles)].iter() {
            for entry in &taxonomy.index {
                let group = taxonomy
                    .groups
                    .iter()
                    .find(|g| g.name == entry.name)
                    .unwrap();
                assert_eq!(entry.count, group.articles.len());
            }
        }
    }

    #[test]
    fn test_equal_counts_keep_first_appearance_order() {
        let articles = vec![
            article("a", "2024-01-01", "z", &["second", "first"]),
            article("b", "2024-01-02", "y", &["first", "second"]),
        ];
        let taxonomy = index_by_tag(&articles);
        let names: Vec<&str> = taxonomy.index.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);

        let categories = index_by_category(&articles);
        let names: Vec<&str> = categories.index.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z", "y"]);
    }

    #[test]
    fn test_slug_collisions_are_reported_not_merged() {
        let articles = vec![
            article("a", "2024-01-01", "x", &["Node.js"]),
            article("b", "2024-01-02", "x", &["node js", "other"]),
        ];
        let taxonomy = index_by_tag(&articles);
        assert_eq!(taxonomy.groups.len(), 3);
        assert_eq!(
            taxonomy.slug_collisions(),
            vec![(
                "node-js".to_owned(),
                vec!["Node.js".to_owned(), "node js".to_owned()]
            )]
        );
    }

    #[test]
    fn test_repeated_tag_counts_twice() {
        let taxonomy = index_by_tag(&[article("a", "2024-01-01", "x", &["rust", "rust"])]);
        assert_eq!(taxonomy.index.len(), 1);
        assert_eq!(taxonomy.index[0].count, 2);
        assert_eq!(titles(&taxonomy.groups[0]), vec!["a", "a"]);
    }

    #[test]
    fn test_fetch_path() {
        let taxonomy = index_by_tag(&[article("a", "2024-01-01", "Deep Learning", &["Node.js"])]);
        assert_eq!(
            taxonomy.groups[0].fetch_path(Kind::Tag),
            "/tags/node-js/articles.json"
        );
        let taxonomy = index_by_category(&[article("a", "2024-01-01", "Deep Learning", &[])]);
        assert_eq!(
            taxonomy.groups[0].fetch_path(Kind::Category),
            "/categories/Deep Learning/articles.json"
        );
    }

    #[test]
    fn test_empty() {
        let taxonomy = index_by_tag(&[]);
        assert!(taxonomy.groups.is_empty());
        assert!(taxonomy.index.is_empty());
    }
}
