pub mod properties;
pub mod rule;
pub mod sections;

use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::category::Category;
use crate::model::{CategoryRules, ParentUsage};

const TITLE_PREFIX: &str = "checkstyle - ";

pub(crate) static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
pub(crate) static CONTENT_BOX: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#contentBox").unwrap());
pub(crate) static H2: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
pub(crate) static H3: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
pub(crate) static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
pub(crate) static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
pub(crate) static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
pub(crate) static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
pub(crate) static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
pub(crate) static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Two-step pipeline: page → rule sections → rules.
pub fn extract_category(
    page: &Html,
    category: &Category,
    usage: &mut ParentUsage,
) -> Result<CategoryRules> {
    let label = page_label(page)?;
    let sections = sections::rule_sections(page, category)?;
    debug!("{}: {} rule sections", category.id, sections.len());

    let rules = sections
        .into_iter()
        .enumerate()
        .map(|(i, section)| {
            rule::extract_rule(section, usage)
                .with_context(|| format!("rule section {} of '{}'", i, category.id))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CategoryRules { label, rules })
}

/// Human-readable category name, taken from the page title.
fn page_label(page: &Html) -> Result<String> {
    let title = page
        .select(&TITLE)
        .next()
        .map(text_of)
        .context("page has no <title>")?;
    Ok(match title.strip_prefix(TITLE_PREFIX) {
        Some(label) => label.to_string(),
        None => {
            warn!("Page title {:?} lacks the {:?} prefix", title, TITLE_PREFIX);
            title.trim().to_string()
        }
    })
}

// ── DOM helpers ──

pub(crate) fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

pub(crate) fn first<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    el.select(selector).next()
}

pub(crate) fn text_of(el: ElementRef) -> String {
    el.text().collect()
}
