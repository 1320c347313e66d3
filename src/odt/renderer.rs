use crate::common::config::RenderConfig;
use crate::common::errors::AppError;
use crate::common::fs::FsUtil;
use crate::odt::document::Document;
use crate::odt::invoice::{Invoice, InvoiceItem};
use crate::odt::odt_file::OdtFile;
use crate::odt::placeholder::Replacer;
use crate::odt::table::{RowInsertion, TableLocator};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSummary {
    pub output: String,
    pub table: String,
    pub rows_inserted: usize,
    pub table_rows: usize,
}

#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    config: RenderConfig,
    replacer: Replacer,
}

impl InvoiceRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let replacer = Replacer::new(config.date_keys.clone());
        Self { config, replacer }
    }

    pub fn render(
        &self,
        template: &Path,
        invoice: &Invoice,
        items: &[InvoiceItem],
        output: &Path,
    ) -> Result<RenderSummary, AppError> {
        if self.config.footer_rows == 0 {
            return Err(AppError::InvalidInput(
                "footer_rows must be at least 1".to_string(),
            ));
        }
        if output == template {
            return Err(AppError::InvalidPath(format!(
                "output would overwrite the template: {}",
                output.display()
            )));
        }

        let entry = self.config.content_entry.as_str();
        let content = OdtFile::open(template)?.read_entry(entry)?;
        info!("rendering {} with {} items", template.display(), items.len());

        let mut doc = Document::parse(&content)?;
        let (rows_inserted, table_rows) = self.insert_items(&mut doc, invoice, items)?;

        let xml = doc.to_xml_string()?;
        let mapping = invoice.placeholder_mapping(&self.config.currency);
        let xml = self.replacer.replace_values(&xml, &mapping);

        FsUtil::ensure_parent_dir(output)?;
        OdtFile::rewrite(template, output, entry, xml.as_bytes())?;
        info!("wrote {}", output.display());

        Ok(RenderSummary {
            output: output.display().to_string(),
            table: invoice.table_name.clone(),
            rows_inserted,
            table_rows,
        })
    }

    // Renders into `dir` under a name no concurrent render can collide with.
    pub fn render_to_temp(
        &self,
        template: &Path,
        invoice: &Invoice,
        items: &[InvoiceItem],
        dir: &Path,
    ) -> Result<RenderSummary, AppError> {
        let output = FsUtil::unique_temp_odt(dir);
        self.render(template, invoice, items, &output)
    }

    fn insert_items(
        &self,
        doc: &mut Document,
        invoice: &Invoice,
        items: &[InvoiceItem],
    ) -> Result<(usize, usize), AppError> {
        let table = TableLocator::find_table_by_name_mut(doc, &invoice.table_name)
            .ok_or_else(|| AppError::TableNotFound(invoice.table_name.clone()))?;
        debug!(
            "table {} has {} rows",
            invoice.table_name,
            TableLocator::row_count(table)
        );

        let mut insertion = RowInsertion::begin(&mut *table, self.config.footer_rows)?;
        for (index, item) in items.iter().enumerate() {
            insertion.push_row(&item.row_values(index + 1, &self.config.currency))?;
        }
        let inserted = insertion.finish();

        Ok((inserted, TableLocator::row_count(table)))
    }
}
