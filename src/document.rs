use std::io::{self, Write};

use crate::model::{Attribute, CategoryRules, Rule};

pub const SPACES_PER_INDENT: usize = 2;

/// Indentable output: a line of text, or a block one level deeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    Nested(Vec<Line>),
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line::Text(s.to_string())
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Line::Text(s)
    }
}

impl From<Vec<Line>> for Line {
    fn from(lines: Vec<Line>) -> Self {
        Line::Nested(lines)
    }
}

pub fn write_lines<W: Write>(
    out: &mut W,
    lines: &[Line],
    indent_level: usize,
    spaces_per_indent: usize,
) -> io::Result<()> {
    for line in lines {
        match line {
            Line::Text(text) => {
                writeln!(out, "{:width$}{}", "", text, width = indent_level * spaces_per_indent)?
            }
            Line::Nested(children) => {
                write_lines(out, children, indent_level + 1, spaces_per_indent)?
            }
        }
    }
    Ok(())
}

/// A property whose text is fixed and already escaped.
struct StaticProperty {
    name: &'static str,
    description: &'static str,
    type_label: &'static str,
    default_value: &'static str,
}

const CHECKER_DESCRIPTION: &str = "All configurations have root module Checker.";

const CHECKER_PROPERTIES: &[StaticProperty] = &[
    StaticProperty {
        name: "basedir",
        description: "base directory name; stripped off in messages about files",
        type_label: "String",
        default_value: "null",
    },
    StaticProperty {
        name: "cacheFile",
        description: "caches information about files that have checked OK; used to avoid repeated checks of the same files",
        type_label: "File",
        default_value: "null",
    },
    StaticProperty {
        name: "localeCountry",
        description: "locale country for messages",
        type_label: "String",
        default_value: "default locale country for the Java Virtual Machine",
    },
    StaticProperty {
        name: "localeLanguage",
        description: "locale language for messages",
        type_label: "String",
        default_value: "default locale language for the Java Virtual Machine",
    },
    StaticProperty {
        name: "charset",
        description: "name of the file charset",
        type_label: "String",
        default_value: "System property &quot;file.encoding&quot;",
    },
    StaticProperty {
        name: "fileExtensions",
        description: "file extensions that are accepted",
        type_label: "String Set",
        default_value: "all files",
    },
    StaticProperty {
        name: "severity",
        description: "the default severity level of all violations",
        type_label: "Severity",
        default_value: "error",
    },
    StaticProperty {
        name: "haltOnException",
        description: "whether to stop execution of Checkstyle if a single file produces any kind of exception during verification",
        type_label: "Boolean",
        default_value: "true",
    },
];

const TREE_WALKER_DESCRIPTION: &str = "FileSetCheck TreeWalker checks individual Java source files and defines properties that are applicable to checking such files.";

const TREE_WALKER_PROPERTIES: &[StaticProperty] = &[
    StaticProperty {
        name: "tabWidth",
        description: r"number of expanded spaces for a tab character (&quot;\t&quot;); used in messages and Checks that require a tab width, such as LineLength",
        type_label: "Integer",
        default_value: "8",
    },
    StaticProperty {
        name: "fileExtensions",
        description: "file type extension to identify Java files. Setting this property is typically only required if your Java source code is preprocessed before compilation and the original files do not have the extension .java",
        type_label: "String Set",
        default_value: ".java",
    },
];

pub fn header_lines() -> Vec<Line> {
    vec![r#"<?xml version="1.0"?>"#.into(), "<!DOCTYPE root>".into()]
}

pub fn checker_lines() -> Vec<Line> {
    module_block("Checker", None, CHECKER_DESCRIPTION, static_properties(CHECKER_PROPERTIES))
}

pub fn tree_walker_lines() -> Vec<Line> {
    module_block(
        "TreeWalker",
        Some("Checker"),
        TREE_WALKER_DESCRIPTION,
        static_properties(TREE_WALKER_PROPERTIES),
    )
}

fn static_properties(props: &[StaticProperty]) -> Vec<Line> {
    props
        .iter()
        .map(|p| property_line(p.name, p.description, p.type_label, p.default_value))
        .collect()
}

/// Category open line, every rule block one level below the next, close line.
pub fn category_lines(category: &CategoryRules) -> Vec<Line> {
    vec![
        format!(r#"<category name="{}">"#, category.label).into(),
        Line::Nested(category.rules.iter().map(|r| Line::Nested(rule_lines(r))).collect()),
        "</category>".into(),
    ]
}

pub fn rule_lines(rule: &Rule) -> Vec<Line> {
    let properties = rule.attributes.iter().map(attribute_line).collect();
    module_block(&rule.name, Some(rule.parent.as_str()), &rule.description, properties)
}

fn module_block(name: &str, parent: Option<&str>, description: &str, properties: Vec<Line>) -> Vec<Line> {
    let open = match parent {
        Some(parent) => format!(
            r#"<module name="{}" parent="{}" description="{}">"#,
            name, parent, description
        ),
        None => format!(r#"<module name="{}" description="{}">"#, name, description),
    };
    vec![open.into(), Line::Nested(properties), "</module>".into()]
}

fn attribute_line(attr: &Attribute) -> Line {
    property_line(&attr.name, &attr.description, &attr.type_label, &attr.default_value)
}

fn property_line(name: &str, description: &str, type_label: &str, default_value: &str) -> Line {
    format!(
        r#"<property name="{}" description="{}" type="{}" default="{}"/>"#,
        name, description, type_label, default_value
    )
    .into()
}

/// The whole catalog: header, then root with the fixed modules and one
/// block per category.
pub fn catalog_lines(categories: &[CategoryRules]) -> Vec<Line> {
    let mut root: Vec<Line> = vec!["<root>".into(), checker_lines().into(), tree_walker_lines().into()];
    root.extend(categories.iter().map(|c| Line::Nested(category_lines(c))));
    root.push("</root>".into());

    let mut lines = header_lines();
    lines.extend(root);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(lines: &[Line]) -> String {
        let mut out = Vec::new();
        write_lines(&mut out, lines, 0, SPACES_PER_INDENT).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn rule(name: &str, attributes: Vec<Attribute>) -> Rule {
        Rule {
            name: name.to_string(),
            parent: "TreeWalker".to_string(),
            description: "Does things.".to_string(),
            attributes,
        }
    }

    #[test]
    fn nested_block_indent() {
        let lines = vec![Line::from("<a>"), Line::Nested(vec!["<b/>".into()]), "</a>".into()];
        assert_eq!(render(&lines), "<a>\n  <b/>\n</a>\n");
    }

    #[test]
    fn indent_width_and_start_level() {
        let lines = vec![Line::from("x"), Line::Nested(vec![Line::Nested(vec!["y".into()])])];
        let mut out = Vec::new();
        write_lines(&mut out, &lines, 1, 4).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "    x\n            y\n");
    }

    #[test]
    fn rule_without_properties() {
        let lines = rule_lines(&rule("EmptyStatement", vec![]));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], Line::Nested(vec![]));
        assert_eq!(
            render(&lines),
            "<module name=\"EmptyStatement\" parent=\"TreeWalker\" description=\"Does things.\">\n</module>\n"
        );
    }

    #[test]
    fn rule_with_properties() {
        let attr = Attribute {
            name: "max".into(),
            description: "maximum".into(),
            type_label: "Integer".into(),
            default_value: "3".into(),
        };
        let text = render(&rule_lines(&rule("NestedIfDepth", vec![attr])));
        assert_eq!(
            text,
            "<module name=\"NestedIfDepth\" parent=\"TreeWalker\" description=\"Does things.\">\n  \
             <property name=\"max\" description=\"maximum\" type=\"Integer\" default=\"3\"/>\n\
             </module>\n"
        );
    }

    #[test]
    fn category_rules_two_levels_down() {
        let cat = CategoryRules {
            label: "Imports".into(),
            rules: vec![rule("AvoidStarImport", vec![])],
        };
        let text = render(&catalog_lines(&[cat]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0"?>"#);
        assert_eq!(lines[1], "<!DOCTYPE root>");
        assert_eq!(lines[2], "<root>");
        assert_eq!(lines[3], r#"  <module name="Checker" description="All configurations have root module Checker.">"#);
        assert!(lines.contains(&r#"  <category name="Imports">"#));
        assert!(lines.iter().any(|l| l.starts_with(r#"      <module name="AvoidStarImport""#)));
        assert_eq!(lines[lines.len() - 2], "  </category>");
        assert_eq!(lines[lines.len() - 1], "</root>");
    }

    #[test]
    fn fixed_modules() {
        let text = render(&catalog_lines(&[]));
        assert_eq!(text.matches("<property ").count(), 10);
        assert!(text.contains(r#"<module name="TreeWalker" parent="Checker""#));
        assert!(text.contains(r#"default="System property &quot;file.encoding&quot;""#));
        assert!(text.contains(r#"(&quot;\t&quot;)"#));
    }
}
