use std::collections::HashMap;

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html};

use super::{child_elements, first, text_of, CONTENT_BOX, H3};
use crate::category::Category;

/// The rule sections of a page: direct child sections of the content box,
/// minus the category's leading boilerplate.
pub fn rule_sections<'a>(page: &'a Html, category: &Category) -> Result<Vec<ElementRef<'a>>> {
    let content = page
        .select(&CONTENT_BOX)
        .next()
        .ok_or_else(|| anyhow!("page for '{}' has no #contentBox element", category.id))?;

    Ok(child_sections(content).skip(category.skip_sections).collect())
}

pub fn is_section(el: &ElementRef) -> bool {
    let e = el.value();
    e.name() == "section" || e.classes().any(|c| c == "section")
}

pub fn child_sections<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    child_elements(el).filter(is_section)
}

/// A rule's subsections keyed by their `<h3>` heading. A later subsection
/// replaces an earlier one with the same heading.
#[derive(Debug)]
pub struct Subsections<'a> {
    by_heading: HashMap<String, ElementRef<'a>>,
}

impl<'a> Subsections<'a> {
    pub fn of(rule: ElementRef<'a>) -> Result<Self> {
        let mut by_heading = HashMap::new();
        for (i, section) in child_sections(rule).enumerate() {
            let h3 = first(section, &H3).ok_or_else(|| anyhow!("subsection {} has no <h3>", i))?;
            by_heading.insert(text_of(h3).trim().to_string(), section);
        }
        Ok(Subsections { by_heading })
    }

    pub fn get(&self, heading: &str) -> Option<ElementRef<'a>> {
        self.by_heading.get(heading).copied()
    }

    pub fn require(&self, heading: &str) -> Result<ElementRef<'a>> {
        self.get(heading)
            .ok_or_else(|| anyhow!("no '{}' subsection", heading))
    }
}
