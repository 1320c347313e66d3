use crate::common::config::RenderConfig;
use crate::common::errors::AppError;
use crate::common::fs::FsUtil;
use crate::common::json::JsonUtil;
use crate::odt::document::Document;
use crate::odt::odt_file::OdtFile;
use crate::odt::placeholder::Replacer;
use crate::odt::table::{RowStyleExtractor, StylePair, TableLocator, TABLE_NAME, TABLE_ROW};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct InspectTemplateInput {
    path: String,
}

#[derive(Debug, Serialize)]
struct InspectTemplateOutput {
    mimetype: Option<String>,
    entries: Vec<String>,
    tables: Vec<TableInfo>,
    placeholders: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TableInfo {
    name: String,
    rows: usize,
    // Style pairs of every row, in row order.
    row_styles: Vec<Vec<StylePair>>,
}

pub fn handle(params: Value) -> Result<Value, AppError> {
    // Read-only: reports what a render would see in the template.
    let input: InspectTemplateInput = JsonUtil::from_value(params)?;
    let path = FsUtil::resolve_template_path(&input.path)?;
    let config = RenderConfig::from_env();

    let mimetype = OdtFile::mimetype(&path)?;
    let mut archive = OdtFile::open(&path)?;
    let entries = archive.entry_names();
    let content = archive.read_entry_string(&config.content_entry)?;
    let doc = Document::parse_str(&content)?;

    let tables = TableLocator::tables(&doc)
        .into_iter()
        .map(|table| TableInfo {
            name: table.attr(TABLE_NAME).unwrap_or_default().to_string(),
            rows: TableLocator::row_count(table),
            row_styles: table
                .child_elements()
                .filter(|e| e.name == TABLE_ROW)
                .map(RowStyleExtractor::extract_styles)
                .collect(),
        })
        .collect();

    JsonUtil::to_value(InspectTemplateOutput {
        mimetype,
        entries,
        tables,
        placeholders: Replacer::placeholders(&content),
    })
}
