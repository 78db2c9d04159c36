use anyhow::{anyhow, bail, Context, Result};
use scraper::ElementRef;

use super::sections::Subsections;
use super::{child_elements, first, properties, text_of, A, H2, P, TABLE};
use crate::model::{ParentUsage, Rule};
use crate::normalize::{first_sentence, normalize};

/// Extract one rule from its page section, counting its parent in `usage`.
pub fn extract_rule(section: ElementRef, usage: &mut ParentUsage) -> Result<Rule> {
    let name = first(section, &H2)
        .map(text_of)
        .ok_or_else(|| anyhow!("rule section has no <h2> name"))?;
    let subs = Subsections::of(section).with_context(|| format!("subsections of {}", name))?;

    let parent = parent_module(subs.require("Parent Module")?)
        .with_context(|| format!("parent of {}", name))?;
    usage.record(&parent);

    let paragraphs: Vec<String> = child_elements(subs.require("Description")?)
        .filter(|e| e.value().name() == "p")
        .map(text_of)
        .collect();
    let description = describe(&paragraphs).with_context(|| format!("description of {}", name))?;

    let attributes = match subs.get("Properties") {
        Some(props) => {
            let table = first(props, &TABLE)
                .ok_or_else(|| anyhow!("Properties of {} has no table", name))?;
            properties::parse_table(table).with_context(|| format!("properties of {}", name))?
        }
        None => Vec::new(),
    };

    Ok(Rule {
        name,
        parent,
        description,
        attributes,
    })
}

fn parent_module(section: ElementRef) -> Result<String> {
    let link = first(section, &P)
        .and_then(|p| first(p, &A))
        .ok_or_else(|| anyhow!("no parent module link"))?;
    let parent = text_of(link);
    if parent.is_empty() {
        bail!("empty parent module link");
    }
    Ok(parent)
}

/// First sentence of the descriptive paragraph. A leading "Since ..."
/// paragraph only carries the version the rule appeared in.
pub fn describe(paragraphs: &[String]) -> Result<String> {
    let first = paragraphs
        .first()
        .ok_or_else(|| anyhow!("no description paragraphs"))?;
    let text = if first.trim_start().starts_with("Since") {
        paragraphs
            .get(1)
            .ok_or_else(|| anyhow!("only a 'Since' paragraph"))?
    } else {
        first
    };
    Ok(first_sentence(&normalize(text, true)))
}
