use crate::common::config::RenderConfig;
use crate::common::errors::AppError;
use crate::common::fs::FsUtil;
use crate::common::json::JsonUtil;
use crate::odt::converter::{DocumentConverter, OfficeConverter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ConvertToPdfInput {
    path: String,
    #[serde(default)]
    out_dir: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConvertToPdfOutput {
    pdf: String,
}

pub fn handle(params: Value) -> Result<Value, AppError> {
    let input: ConvertToPdfInput = JsonUtil::from_value(params)?;
    let odt = FsUtil::resolve_template_path(&input.path)?;
    let out_dir = match input.out_dir.as_deref() {
        Some(dir) => FsUtil::resolve_path(dir)?,
        None => odt
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Path::new(".").to_path_buf()),
    };
    std::fs::create_dir_all(&out_dir)?;

    let converter = OfficeConverter::new(&RenderConfig::from_env().converter);
    let pdf = converter.convert(&odt, &out_dir)?;

    JsonUtil::to_value(ConvertToPdfOutput {
        pdf: pdf.display().to_string(),
    })
}
