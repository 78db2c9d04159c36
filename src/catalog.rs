use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use quick_xml::events::{BytesStart, Event};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::model::Attribute;

const ID_DESCRIPTION: &str = "Each module has a id property that can rename the module name to be a name defined by the user. This is used to differentiate two instances of the same Check. This custom module name should be unique for the entire configuration to prevent accidental overlapping. This custom name is required to be able to suppress violations of 1 of the checks in specific scenarios, while leaving the other unaffected. Without the custom module name, it is harder to differentiate one module's violations from the other.";

const SEVERITY_DESCRIPTION: &str = "the default severity level of all violations";

/// Default values are written without quote escaping, so a default such as
/// `"statement"` ends up as `default=""statement""/>`.
static RAW_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)( default=")(.*)("/>[ \t\r]*)$"#).unwrap());

#[derive(Debug, Clone, Serialize)]
pub struct CatalogModule {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub description: String,
    pub properties: Vec<Attribute>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogCategory {
    pub name: String,
    pub rules: Vec<CatalogModule>,
}

/// A generated rule catalog read back from disk.
#[derive(Debug, Default, Serialize)]
pub struct Catalog {
    /// Modules outside any category (Checker, TreeWalker).
    pub modules: Vec<CatalogModule>,
    pub categories: Vec<CatalogCategory>,
}

impl Catalog {
    pub fn find_rule(&self, name: &str) -> Option<&CatalogModule> {
        self.modules
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.rules.iter()))
            .find(|m| m.name == name)
    }

    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }

    /// Store a finished module, adding the properties every module has
    /// implicitly: `id`, and `severity` for everything below Checker.
    fn place(&mut self, category: Option<&mut CatalogCategory>, mut module: CatalogModule) {
        let declares = |m: &CatalogModule, name: &str| m.properties.iter().any(|p| p.name == name);
        if !declares(&module, "id") {
            module.properties.push(id_property());
        }
        if module.name != "Checker" && !declares(&module, "severity") {
            module.properties.push(severity_property());
        }
        match category {
            Some(c) => c.rules.push(module),
            None => self.modules.push(module),
        }
    }
}

fn id_property() -> Attribute {
    Attribute {
        name: "id".to_string(),
        description: ID_DESCRIPTION.to_string(),
        type_label: "String".to_string(),
        default_value: "null".to_string(),
    }
}

fn severity_property() -> Attribute {
    Attribute {
        name: "severity".to_string(),
        description: SEVERITY_DESCRIPTION.to_string(),
        type_label: "Severity".to_string(),
        default_value: "error".to_string(),
    }
}

pub fn read_catalog_file(path: &Path) -> Result<Catalog> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    read_catalog(&xml).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse catalog XML into root modules and categorised rules.
pub fn read_catalog(xml: &str) -> Result<Catalog> {
    let xml = escape_raw_defaults(xml);
    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut catalog = Catalog::default();
    let mut category: Option<CatalogCategory> = None;
    let mut module: Option<CatalogModule> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"category" => {
                    category = Some(CatalogCategory {
                        name: required_attr(&e, &mut attributes(&e)?, "name")?,
                        rules: Vec::new(),
                    })
                }
                b"module" => module = Some(module_from(&e)?),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"property" => {
                    let m = module
                        .as_mut()
                        .ok_or_else(|| anyhow!("<property> outside of a <module>"))?;
                    m.properties.push(property_from(&e)?);
                }
                b"module" => catalog.place(category.as_mut(), module_from(&e)?),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"module" => {
                    if let Some(m) = module.take() {
                        catalog.place(category.as_mut(), m);
                    }
                }
                b"category" => {
                    if let Some(c) = category.take() {
                        catalog.categories.push(c);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(catalog)
}

/// Re-escape the quotes inside a property's raw default so the line parses.
fn escape_raw_defaults(xml: &str) -> Cow<'_, str> {
    RAW_DEFAULT_RE.replace_all(xml, |caps: &Captures| {
        format!("{}{}{}", &caps[1], caps[2].replace('"', "&quot;"), &caps[3])
    })
}

fn module_from(e: &BytesStart) -> Result<CatalogModule> {
    let mut attrs = attributes(e)?;
    Ok(CatalogModule {
        name: required_attr(e, &mut attrs, "name")?,
        parent: attrs.remove("parent"),
        description: attrs.remove("description").unwrap_or_default(),
        properties: Vec::new(),
    })
}

fn property_from(e: &BytesStart) -> Result<Attribute> {
    let mut attrs = attributes(e)?;
    Ok(Attribute {
        name: required_attr(e, &mut attrs, "name")?,
        description: attrs.remove("description").unwrap_or_default(),
        type_label: attrs.remove("type").unwrap_or_default(),
        default_value: attrs.remove("default").unwrap_or_default(),
    })
}

/// Every attribute of `e`, unescaped. Malformed attributes are errors.
fn attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        attrs.insert(key, attr.unescape_value()?.into_owned());
    }
    Ok(attrs)
}

fn required_attr(e: &BytesStart, attrs: &mut HashMap<String, String>, name: &str) -> Result<String> {
    attrs.remove(name).ok_or_else(|| {
        anyhow!(
            "<{}> without '{}' attribute",
            String::from_utf8_lossy(e.name().as_ref()),
            name
        )
    })
}
