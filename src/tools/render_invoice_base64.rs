use crate::common::errors::AppError;
use crate::common::json::JsonUtil;
use crate::odt::invoice::InvoiceRequest;
use crate::tools::render_invoice::{self, RenderOptions};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RenderInvoiceBase64Input {
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    output: Option<String>,
    // Base64 of `{"invoice": {...}, "items": [...]}`.
    data: String,
    #[serde(default)]
    footer_rows: Option<usize>,
    #[serde(default)]
    currency: Option<String>,
}

pub fn handle(params: Value) -> Result<Value, AppError> {
    let input: RenderInvoiceBase64Input = JsonUtil::from_value(params)?;
    let request: InvoiceRequest = JsonUtil::from_base64(&input.data)?;
    render_invoice::render(
        input.template.as_deref(),
        input.output.as_deref(),
        &request,
        &RenderOptions {
            footer_rows: input.footer_rows,
            currency: input.currency,
        },
    )
}
