use std::collections::BTreeMap;

use serde::Serialize;

/// A configurable property of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(rename = "default")]
    pub default_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub parent: String,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

/// Rules extracted from one category page, under the page's label.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    pub label: String,
    pub rules: Vec<Rule>,
}

/// How many rules name each parent module.
#[derive(Debug, Default)]
pub struct ParentUsage {
    counts: BTreeMap<String, usize>,
}

impl ParentUsage {
    pub fn record(&mut self, parent: &str) {
        *self.counts.entry(parent.to_string()).or_insert(0) += 1;
    }

    #[cfg(test)]
    pub fn count(&self, parent: &str) -> usize {
        self.counts.get(parent).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn print(&self) {
        println!("Parent modules:");
        for (parent, count) in self.iter() {
            println!("  {}: {}", parent, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_accumulates_sorted() {
        let mut usage = ParentUsage::default();
        usage.record("TreeWalker");
        usage.record("Checker");
        usage.record("TreeWalker");
        assert_eq!(usage.count("TreeWalker"), 2);
        assert_eq!(usage.count("Checker"), 1);
        assert_eq!(usage.count("Nope"), 0);
        let order: Vec<_> = usage.iter().map(|(p, _)| p).collect();
        assert_eq!(order, ["Checker", "TreeWalker"]);
    }
}
