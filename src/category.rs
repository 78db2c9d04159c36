pub const DOCS_BASE_URL: &str = "https://checkstyle.sourceforge.io";

/// One documentation page of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    /// Leading sections of the page that describe the page itself, not a rule.
    pub skip_sections: usize,
}

impl Category {
    pub const fn new(id: &'static str, skip_sections: usize) -> Self {
        Category { id, skip_sections }
    }

    pub fn url(&self, base: &str) -> String {
        format!("{}/config_{}.html", base.trim_end_matches('/'), self.id)
    }
}

/// Every category, in the order it appears in the catalog.
pub const CATEGORIES: [Category; 14] = [
    Category::new("annotation", 1),
    Category::new("blocks", 1),
    Category::new("design", 1),
    Category::new("coding", 1),
    Category::new("header", 1),
    Category::new("imports", 1),
    Category::new("javadoc", 1),
    Category::new("metrics", 1),
    Category::new("misc", 1),
    Category::new("modifier", 1),
    Category::new("naming", 2), // naming conventions overview table
    Category::new("regexp", 1),
    Category::new("sizes", 1),
    Category::new("whitespace", 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_from_id() {
        let c = Category::new("imports", 1);
        assert_eq!(
            c.url(DOCS_BASE_URL),
            "https://checkstyle.sourceforge.io/config_imports.html"
        );
        assert_eq!(c.url("http://localhost:8080/"), "http://localhost:8080/config_imports.html");
    }

    #[test]
    fn only_naming_skips_two() {
        for c in CATEGORIES {
            let expected = if c.id == "naming" { 2 } else { 1 };
            assert_eq!(c.skip_sections, expected, "{}", c.id);
        }
    }
}
