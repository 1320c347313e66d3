use crate::common::errors::AppError;
use crate::odt::document::{Document, Element, Node};
use serde::Serialize;
use tracing::debug;

pub const TABLE: &str = "table:table";
pub const TABLE_NAME: &str = "table:name";
pub const TABLE_ROW: &str = "table:table-row";
pub const TABLE_CELL: &str = "table:table-cell";
pub const TABLE_STYLE_NAME: &str = "table:style-name";
pub const TEXT_P: &str = "text:p";
pub const TEXT_STYLE_NAME: &str = "text:style-name";
pub const OFFICE_VALUE_TYPE: &str = "office:value-type";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StylePair {
    pub cell_style: String,
    pub text_style: String,
}

pub struct TableLocator;

impl TableLocator {
    pub fn find_table_by_name<'a>(doc: &'a Document, name: &str) -> Option<&'a Element> {
        doc.find_first(&|e: &Element| Self::is_named_table(e, name))
    }

    pub fn find_table_by_name_mut<'a>(doc: &'a mut Document, name: &str) -> Option<&'a mut Element> {
        doc.find_first_mut(&|e: &Element| Self::is_named_table(e, name))
    }

    pub fn tables(doc: &Document) -> Vec<&Element> {
        doc.find_all(&|e: &Element| e.name == TABLE)
    }

    pub fn row_count(table: &Element) -> usize {
        table.child_elements().filter(|e| e.name == TABLE_ROW).count()
    }

    fn is_named_table(e: &Element, name: &str) -> bool {
        e.name == TABLE && e.attr(TABLE_NAME) == Some(name)
    }
}

pub struct RowStyleExtractor;

impl RowStyleExtractor {
    // Columns missing either style are skipped, so the result can be shorter than the row.
    pub fn extract_styles(row: &Element) -> Vec<StylePair> {
        row.child_elements()
            .filter_map(|cell| {
                let cell_style = cell.attr(TABLE_STYLE_NAME).unwrap_or_default();
                let text_style = cell
                    .child_elements()
                    .next()
                    .and_then(|p| p.attr(TEXT_STYLE_NAME))
                    .unwrap_or_default();
                if cell_style.is_empty() || text_style.is_empty() {
                    return None;
                }
                Some(StylePair {
                    cell_style: cell_style.to_string(),
                    text_style: text_style.to_string(),
                })
            })
            .collect()
    }
}

pub struct RowBuilder;

impl RowBuilder {
    pub fn build_row(values: &[String], styles: &[StylePair]) -> Result<Element, AppError> {
        if values.len() != styles.len() {
            return Err(AppError::StyleColumnMismatch {
                values: values.len(),
                styles: styles.len(),
            });
        }
        let mut row = Element::new(TABLE_ROW);
        for (value, style) in values.iter().zip(styles) {
            row.push_element(Self::build_cell(value, style));
        }
        Ok(row)
    }

    // One paragraph per line of the value.
    pub fn build_cell(value: &str, style: &StylePair) -> Element {
        let mut cell = Element::new(TABLE_CELL)
            .with_attr(OFFICE_VALUE_TYPE, "string")
            .with_attr(TABLE_STYLE_NAME, &style.cell_style);
        for line in value.split('\n') {
            cell.push_element(
                Element::new(TEXT_P)
                    .with_attr(TEXT_STYLE_NAME, &style.text_style)
                    .with_text(line),
            );
        }
        cell
    }
}

// Holds the detached footer rows until `finish` puts them back under the new item rows.
pub struct RowInsertion<'a> {
    table: &'a mut Element,
    footer: Vec<Element>,
    styles: Vec<StylePair>,
    inserted: usize,
}

impl<'a> RowInsertion<'a> {
    pub fn begin(table: &'a mut Element, footer_rows: usize) -> Result<Self, AppError> {
        let footer = Self::backup_trailing_rows(table, footer_rows);
        let Some(reference) = footer.first() else {
            let name = table.attr(TABLE_NAME).unwrap_or_default().to_string();
            return Err(AppError::MissingReferenceRow(name));
        };
        let styles = RowStyleExtractor::extract_styles(reference);
        debug!(
            "detached {} footer rows, {} styled columns",
            footer.len(),
            styles.len()
        );
        Ok(Self {
            table,
            footer,
            styles,
            inserted: 0,
        })
    }

    pub fn styles(&self) -> &[StylePair] {
        &self.styles
    }

    pub fn push_row(&mut self, values: &[String]) -> Result<(), AppError> {
        let row = RowBuilder::build_row(values, &self.styles)?;
        self.table.push_element(row);
        self.inserted += 1;
        Ok(())
    }

    pub fn finish(self) -> usize {
        for row in self.footer {
            self.table.push_element(row);
        }
        self.inserted
    }

    // Removes the last `count` row children (all of them if fewer), keeping document order.
    fn backup_trailing_rows(table: &mut Element, count: usize) -> Vec<Element> {
        let positions: Vec<usize> = table
            .children
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n, Node::Element(e) if e.name == TABLE_ROW))
            .map(|(i, _)| i)
            .collect();
        let keep = positions.len().saturating_sub(count);

        let mut backup = Vec::with_capacity(positions.len() - keep);
        for &pos in positions[keep..].iter().rev() {
            if let Node::Element(row) = table.children.remove(pos) {
                backup.push(row);
            }
        }
        backup.reverse();
        backup
    }
}
