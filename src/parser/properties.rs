use anyhow::{anyhow, Result};
use scraper::ElementRef;

use super::{text_of, TD, TH, TR};
use crate::model::Attribute;
use crate::normalize::normalize;

/// Columns a properties table must have. Their order in the page varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Description,
    Type,
    DefaultValue,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Name,
        Column::Description,
        Column::Type,
        Column::DefaultValue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Description => "description",
            Column::Type => "type",
            Column::DefaultValue => "default value",
        }
    }
}

/// Cell position of each required column, indexed by `Column as usize`.
#[derive(Debug, PartialEq, Eq)]
pub struct ColumnMap([usize; 4]);

impl ColumnMap {
    pub fn from_headers(headers: &[String]) -> Result<Self> {
        let mut positions = [0; 4];
        for col in Column::ALL {
            positions[col as usize] = headers
                .iter()
                .position(|h| h.trim() == col.label())
                .ok_or_else(|| anyhow!("properties table has no '{}' column", col.label()))?;
        }
        Ok(ColumnMap(positions))
    }

    pub fn position(&self, col: Column) -> usize {
        self.0[col as usize]
    }
}

/// Parse a properties table: the header row names the columns, every
/// following row is one attribute.
pub fn parse_table(table: ElementRef) -> Result<Vec<Attribute>> {
    let mut rows = table.select(&TR);
    let header = rows
        .next()
        .ok_or_else(|| anyhow!("properties table has no rows"))?;
    let headers: Vec<String> = header.select(&TH).map(text_of).collect();
    let columns = ColumnMap::from_headers(&headers)?;

    rows.enumerate()
        .map(|(i, row)| {
            let cells: Vec<String> = row.select(&TD).map(text_of).collect();
            parse_row(&cells, &columns).map_err(|e| e.context(format!("properties row {}", i + 1)))
        })
        .collect()
}

fn parse_row(cells: &[String], columns: &ColumnMap) -> Result<Attribute> {
    Ok(Attribute {
        name: cell(cells, columns, Column::Name)?.to_string(),
        description: normalize(cell(cells, columns, Column::Description)?, true),
        type_label: normalize(cell(cells, columns, Column::Type)?, true),
        default_value: normalize(cell(cells, columns, Column::DefaultValue)?, false),
    })
}

fn cell<'a>(cells: &'a [String], columns: &ColumnMap, col: Column) -> Result<&'a str> {
    cells
        .get(columns.position(col))
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing '{}' cell", col.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TABLE;
    use scraper::Html;

    fn table_attrs(html: &str) -> Result<Vec<Attribute>> {
        let doc = Html::parse_document(html);
        let table = doc.select(&TABLE).next().unwrap();
        parse_table(table)
    }

    #[test]
    fn canonical_order() {
        let attrs = table_attrs(
            r#"<table>
                <tr><th>name</th><th>description</th><th>type</th><th>default value</th></tr>
                <tr><td>max</td><td>allowed  maximum
                    depth</td><td>Integer</td><td><code>1</code></td></tr>
                <tr><td>tokens</td><td>tokens to check</td><td>subset of tokens <a>LITERAL_IF</a></td><td>LITERAL_IF, LITERAL_FOR</td></tr>
            </table>"#,
        )
        .unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "max");
        assert_eq!(attrs[0].description, "allowed maximum depth");
        assert_eq!(attrs[0].type_label, "Integer");
        assert_eq!(attrs[0].default_value, "1");
        assert_eq!(attrs[1].type_label, "subset of tokens LITERAL_IF");
    }

    #[test]
    fn shuffled_header_order() {
        let attrs = table_attrs(
            r#"<table>
                <tr><th>default value</th><th>type</th><th>name</th><th>description</th></tr>
                <tr><td>"^[a-z]$"</td><td>Pattern</td><td>format</td><td>name pattern &amp; "rules"</td></tr>
            </table>"#,
        )
        .unwrap();
        let a = &attrs[0];
        assert_eq!(a.name, "format");
        assert_eq!(a.description, "name pattern &amp; &quot;rules&quot;");
        assert_eq!(a.type_label, "Pattern");
        assert_eq!(a.default_value, r#""^[a-z]$""#);
    }

    #[test]
    fn name_not_normalized() {
        let attrs = table_attrs(
            "<table><tr><th>name</th><th>description</th><th>type</th><th>default value</th></tr>\
             <tr><td> spaced </td><td>d</td><td>t</td><td>v</td></tr></table>",
        )
        .unwrap();
        assert_eq!(attrs[0].name, " spaced ");
    }

    #[test]
    fn missing_header_names_column() {
        let err = table_attrs(
            "<table><tr><th>name</th><th>description</th><th>default value</th></tr>\
             <tr><td>a</td><td>b</td><td>c</td></tr></table>",
        )
        .unwrap_err();
        assert!(err.to_string().contains("'type'"), "{}", err);
    }

    #[test]
    fn short_row_is_error() {
        let err = table_attrs(
            "<table><tr><th>name</th><th>description</th><th>type</th><th>default value</th></tr>\
             <tr><td>a</td><td>b</td></tr></table>",
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("missing 'type' cell"), "{:#}", err);
    }

    #[test]
    fn header_map_positions() {
        let headers: Vec<String> = ["type", "name", "default value", "description"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(map.position(Column::Name), 1);
        assert_eq!(map.position(Column::Description), 3);
        assert_eq!(map.position(Column::Type), 0);
        assert_eq!(map.position(Column::DefaultValue), 2);
    }
}
