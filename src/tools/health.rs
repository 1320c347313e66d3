use crate::common::config::RenderConfig;
use crate::common::errors::AppError;
use crate::common::fs::FsUtil;
use crate::common::json::JsonUtil;
use crate::odt::converter::OfficeConverter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
struct HealthInput {
    #[serde(default)]
    template: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthOutput {
    status: &'static str,
    timestamp: String,
    template: String,
    template_exists: bool,
    converter: String,
    converter_available: bool,
}

pub fn handle(params: Value) -> Result<Value, AppError> {
    let input: HealthInput = if params.is_null() {
        HealthInput::default()
    } else {
        JsonUtil::from_value(params)?
    };
    let config = RenderConfig::from_env();
    let template = FsUtil::resolve_path(input.template.as_deref().unwrap_or(&config.template))?;
    let converter = OfficeConverter::new(&config.converter);

    JsonUtil::to_value(HealthOutput {
        status: "healthy",
        timestamp: chrono::Utc::now().to_rfc3339(),
        template: template.display().to_string(),
        template_exists: template.is_file(),
        converter: converter.program().to_string(),
        converter_available: converter.is_available(),
    })
}
