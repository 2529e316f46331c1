//! Renders the `index.md` listing page written next to each group's
//! `articles.json`. The page's markup and script live in `templates/`; the
//! code here only supplies the group's name and the path its script fetches.

use crate::index::Kind;
use gtmpl::Value;
use std::collections::HashMap;
use std::fmt;

const TAG_TEMPLATE: &str = include_str!("../templates/tag.md");
const CATEGORY_TEMPLATE: &str = include_str!("../templates/category.md");

/// Renders the listing page for the group `name` of kind `kind`. The page's
/// script loads `fetch_path`, which must be the site-absolute path of the
/// group's `articles.json`.
pub fn render(kind: Kind, name: &str, fetch_path: &str) -> Result<String> {
    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("name".to_owned(), Value::String(name.to_owned()));
    m.insert("fetch_path".to_owned(), Value::String(fetch_path.to_owned()));

    let template = match kind {
        Kind::Tag => TAG_TEMPLATE,
        Kind::Category => CATEGORY_TEMPLATE,
    };
    gtmpl::template(template, Value::Object(m)).map_err(|e| Error(e.to_string()))
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to render a listing template.
#[derive(Debug)]
pub struct Error(String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "rendering listing page: {}", self.0)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render_tag_page() {
        let page = render(Kind::Tag, "Node.js", "/tags/node-js/articles.json").unwrap();
        assert!(page.starts_with("---\ntitle: Node.js 标签文章列表\n---\n"));
        assert!(page.contains("🔖 Node.js</h1>"));
        assert!(page.contains("fetch('/tags/node-js/articles.json')"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_render_category_page() {
        let page = render(
            Kind::Category,
            "随笔",
            "/categories/随笔/articles.json",
        )
        .unwrap();
        assert!(page.starts_with("---\ntitle: 随笔文章列表\n---\n"));
        assert!(page.contains("🔧 随笔</h1>"));
        assert!(page.contains("fetch('/categories/随笔/articles.json')"));
    }

    #[test]
    fn test_render_keeps_script_literals() {
        let page = render(Kind::Tag, "x", "/tags/x/articles.json").unwrap();
        assert!(page.contains("${a.title}"));
        assert!(page.contains("const ARTICLES_PER_PAGE = 5;"));
    }
}
