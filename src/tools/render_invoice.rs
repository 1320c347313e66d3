use crate::common::config::RenderConfig;
use crate::common::errors::AppError;
use crate::common::fs::{FsUtil, OutputKind};
use crate::common::json::JsonUtil;
use crate::odt::converter::{DocumentConverter, OfficeConverter};
use crate::odt::invoice::{Invoice, InvoiceItem, InvoiceRequest};
use crate::odt::renderer::InvoiceRenderer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RenderInvoiceInput {
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(alias = "Invoice")]
    invoice: Invoice,
    #[serde(default, alias = "Items")]
    items: Vec<InvoiceItem>,
    #[serde(default)]
    footer_rows: Option<usize>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct RenderOptions {
    pub footer_rows: Option<usize>,
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
struct RenderInvoiceOutput {
    odt: String,
    pdf: Option<String>,
    table: String,
    rows_inserted: usize,
    table_rows: usize,
}

pub fn handle(params: Value) -> Result<Value, AppError> {
    let input: RenderInvoiceInput = JsonUtil::from_value(params)?;
    let request = InvoiceRequest {
        invoice: input.invoice,
        items: input.items,
    };
    let options = RenderOptions {
        footer_rows: input.footer_rows,
        currency: input.currency,
    };
    render(
        input.template.as_deref(),
        input.output.as_deref(),
        &request,
        &options,
    )
}

// Shared by the JSON and base64 front doors.
pub fn render(
    template: Option<&str>,
    output: Option<&str>,
    request: &InvoiceRequest,
    options: &RenderOptions,
) -> Result<Value, AppError> {
    let config = apply_options(RenderConfig::from_env(), options);
    let template = FsUtil::resolve_template_path(template.unwrap_or(&config.template))?;
    let converter = OfficeConverter::new(&config.converter);
    let renderer = InvoiceRenderer::new(config);

    let Some(output) = output else {
        let summary = renderer.render_to_temp(
            &template,
            &request.invoice,
            &request.items,
            &std::env::temp_dir(),
        )?;
        return JsonUtil::to_value(RenderInvoiceOutput {
            odt: summary.output,
            pdf: None,
            table: summary.table,
            rows_inserted: summary.rows_inserted,
            table_rows: summary.table_rows,
        });
    };

    let (path, kind) = FsUtil::resolve_output_path(output)?;
    let odt = match kind {
        OutputKind::Odt => path.clone(),
        OutputKind::Pdf => FsUtil::sibling_odt(&path),
    };
    let summary = renderer.render(&template, &request.invoice, &request.items, &odt)?;

    let pdf = match kind {
        OutputKind::Odt => None,
        OutputKind::Pdf => Some(convert_keeping_odt(&converter, &odt, &path)?),
    };

    JsonUtil::to_value(RenderInvoiceOutput {
        odt: summary.output,
        pdf,
        table: summary.table,
        rows_inserted: summary.rows_inserted,
        table_rows: summary.table_rows,
    })
}

pub fn apply_options(mut config: RenderConfig, options: &RenderOptions) -> RenderConfig {
    if let Some(rows) = options.footer_rows {
        config.footer_rows = rows;
    }
    if let Some(currency) = &options.currency {
        config.currency = currency.clone();
    }
    config
}

fn convert_keeping_odt(
    converter: &impl DocumentConverter,
    odt: &Path,
    pdf: &Path,
) -> Result<String, AppError> {
    let out_dir = pdf.parent().unwrap_or_else(|| Path::new("."));
    match converter.convert(odt, out_dir) {
        Ok(converted) => Ok(converted.display().to_string()),
        Err(err) => {
            warn!("pdf conversion failed, odt kept at {}: {err}", odt.display());
            Err(AppError::ConversionFailed(format!(
                "{err}; rendered odt kept at {}",
                odt.display()
            )))
        }
    }
}
