use crate::odt::odt_file::CONTENT_XML;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

pub const ENV_TEMPLATE: &str = "MCP_ODT_TEMPLATE";
pub const ENV_FOOTER_ROWS: &str = "MCP_ODT_FOOTER_ROWS";
pub const ENV_CURRENCY: &str = "MCP_ODT_CURRENCY";
pub const ENV_CONVERTER: &str = "MCP_ODT_CONVERTER";
pub const ENV_CONVERT_TIMEOUT: &str = "MCP_ODT_CONVERT_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub template: String,
    pub content_entry: String,
    // Trailing rows (totals block) kept below the inserted item rows.
    pub footer_rows: usize,
    pub currency: String,
    // Placeholder keys whose `YYYY-MM-DD` values are rewritten as `DD.MM.YYYY`.
    pub date_keys: Vec<String>,
    pub converter: ConverterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub program: String,
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template: "templates/template.odt".to_string(),
            content_entry: CONTENT_XML.to_string(),
            footer_rows: 3,
            currency: "€".to_string(),
            date_keys: ["datum", "faellig", "documentdate", "duedate"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            converter: ConverterConfig::default(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "soffice".to_string(),
            timeout_secs: 60,
        }
    }
}

impl RenderConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    // Applies overrides from any key/value source; unparseable values keep the default.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(template) = lookup(ENV_TEMPLATE).filter(|v| !v.trim().is_empty()) {
            self.template = template;
        }
        if let Some(rows) = parse_var(&lookup, ENV_FOOTER_ROWS) {
            self.footer_rows = rows;
        }
        if let Some(currency) = lookup(ENV_CURRENCY) {
            self.currency = currency;
        }
        if let Some(program) = lookup(ENV_CONVERTER).filter(|v| !v.trim().is_empty()) {
            self.converter.program = program;
        }
        if let Some(secs) = parse_var(&lookup, ENV_CONVERT_TIMEOUT) {
            self.converter.timeout_secs = secs;
        }
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {key}={raw}: not a valid number");
            None
        }
    }
}
