use crate::common::errors::AppError;
use crate::tools;
use serde_json::{json, Value};

pub struct Dispatcher;

impl Dispatcher {
    pub fn dispatch(method: &str, params: Option<Value>) -> Result<Value, AppError> {
        match method {
            "initialize" => Ok(Self::initialize_result()),
            // Some clients send the namespaced form.
            "initialized" | "notifications/initialized" => Ok(Value::Null),
            "tools/list" => Ok(Self::tools_list_result()),
            "tools/call" => Self::dispatch_tools_call(params),
            _ => Self::dispatch_direct_tool(method, params.unwrap_or(Value::Null)),
        }
    }

    fn dispatch_tools_call(params: Option<Value>) -> Result<Value, AppError> {
        let payload = params.ok_or_else(|| AppError::InvalidInput("missing params".to_string()))?;
        let name = payload
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::InvalidInput("missing tool name".to_string()))?;
        let arguments = payload.get("arguments").cloned().unwrap_or(Value::Null);

        let result = Self::dispatch_direct_tool(name, arguments)?;
        let text = serde_json::to_string_pretty(&result)
            .unwrap_or_else(|_| "{\"error\":\"failed to render tool result\"}".to_string());

        Ok(json!({
            "content": [
                {
                    "type": "text",
                    "text": text
                }
            ],
            "structuredContent": result,
            "isError": false
        }))
    }

    fn dispatch_direct_tool(tool_name: &str, args: Value) -> Result<Value, AppError> {
        match tool_name {
            "render_invoice" => tools::render_invoice::handle(args),
            "render_invoice_base64" => tools::render_invoice_base64::handle(args),
            "convert_to_pdf" => tools::convert_to_pdf::handle(args),
            "inspect_template" => tools::inspect_template::handle(args),
            "health" => tools::health::handle(args),
            _ => Err(AppError::InvalidInput(format!(
                "unknown method/tool: {tool_name}"
            ))),
        }
    }

    fn initialize_result() -> Value {
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "odt-invoice-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn tools_list_result() -> Value {
        json!({
            "tools": [
                {
                    "name": "render_invoice",
                    "description": "Fill an ODT invoice template with header data and item rows. Output ending in .pdf also converts the rendered ODT.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "template": { "type": "string" },
                            "output": { "type": "string", "description": "Target .odt or .pdf; a unique temp .odt when omitted" },
                            "invoice": Self::invoice_schema(),
                            "items": {
                                "type": "array",
                                "items": Self::item_schema()
                            },
                            "footer_rows": { "type": "integer", "minimum": 1, "default": 3 },
                            "currency": { "type": "string", "default": "€" }
                        },
                        "required": ["invoice", "items"]
                    }
                },
                {
                    "name": "render_invoice_base64",
                    "description": "Same as render_invoice with the request given as base64-encoded JSON {invoice, items}.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "template": { "type": "string" },
                            "output": { "type": "string" },
                            "data": { "type": "string" },
                            "footer_rows": { "type": "integer", "minimum": 1 },
                            "currency": { "type": "string" }
                        },
                        "required": ["data"]
                    }
                },
                {
                    "name": "convert_to_pdf",
                    "description": "Convert an ODT file to PDF with the configured office converter.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "path": { "type": "string" },
                            "out_dir": { "type": "string" }
                        },
                        "required": ["path"]
                    }
                },
                {
                    "name": "inspect_template",
                    "description": "List archive entries, tables with row styles, and placeholders of a template.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "path": { "type": "string" }
                        },
                        "required": ["path"]
                    }
                },
                {
                    "name": "health",
                    "description": "Report template and converter availability.",
                    "inputSchema": {
                        "type": "object",
                        "properties": {
                            "template": { "type": "string" }
                        }
                    }
                }
            ]
        })
    }

    fn invoice_schema() -> Value {
        let text = json!({ "type": "string" });
        let number = json!({ "type": "number" });
        json!({
            "type": "object",
            "properties": {
                "salutation": text,
                "name": text,
                "street": text,
                "zip": text,
                "city": text,
                "document_type": text,
                "document_number": text,
                "document_date": { "type": "string", "description": "YYYY-MM-DD" },
                "customer_number": text,
                "net": number,
                "vat_rate": number,
                "vat": number,
                "total": number,
                "due_date": { "type": "string", "description": "YYYY-MM-DD" },
                "table_name": { "type": "string", "description": "table:name of the item table" }
            },
            "required": ["table_name"]
        })
    }

    fn item_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "quantity": { "type": "integer" },
                "unit": { "type": "string" },
                "description": { "type": "string" },
                "unit_price": { "type": "number" },
                "total_price": { "type": "number" }
            }
        })
    }
}
