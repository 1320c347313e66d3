use clap::{Parser, Subcommand};
use mcp_odt::common::errors::{AppError, ErrorKind};
use mcp_odt::common::json::JsonUtil;
use mcp_odt::mcp::server::McpServer;
use mcp_odt::odt::invoice::{Invoice, InvoiceItem, InvoiceRequest};
use mcp_odt::tools::render_invoice::{self, RenderOptions};

#[derive(Debug, Parser)]
#[command(name = "mcp-odt", version, about = "Render invoices from ODT templates")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Serve JSON-RPC (MCP) requests on stdin/stdout")]
    Serve,
    #[command(about = "Render one invoice from base64-encoded JSON payloads")]
    Render {
        #[arg(short, long)]
        template: Option<String>,
        #[arg(short, long, default_value = "output.pdf", help = "Output file, .odt or .pdf")]
        output: String,
        #[arg(short, long, help = "Invoice header as base64 JSON")]
        invoice: String,
        #[arg(short = 'l', long, help = "Invoice items as base64 JSON array")]
        items: String,
        #[arg(long)]
        footer_rows: Option<usize>,
        #[arg(long)]
        currency: Option<String>,
    },
}

fn main() {
    // Logging goes to stderr so stdout stays reserved for responses.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => McpServer::run_stdio().map(|_| None),
        Command::Render {
            template,
            output,
            invoice,
            items,
            footer_rows,
            currency,
        } => render(
            template,
            &output,
            &invoice,
            &items,
            RenderOptions {
                footer_rows,
                currency,
            },
        )
        .map(Some),
    };

    match result {
        Ok(Some(line)) => println!("{line}"),
        Ok(None) => {}
        Err(err) => {
            eprintln!("error: {err}");
            // 2: the ODT was written, only the PDF step failed.
            let code = if err.kind() == ErrorKind::Conversion { 2 } else { 1 };
            std::process::exit(code);
        }
    }
}

fn render(
    template: Option<String>,
    output: &str,
    invoice_b64: &str,
    items_b64: &str,
    options: RenderOptions,
) -> Result<String, AppError> {
    let invoice: Invoice = JsonUtil::from_base64(invoice_b64)?;
    let items: Vec<InvoiceItem> = JsonUtil::from_base64(items_b64)?;
    let request = InvoiceRequest { invoice, items };

    let result = render_invoice::render(template.as_deref(), Some(output), &request, &options)?;
    serde_json::to_string(&result).map_err(|e| AppError::InvalidInput(e.to_string()))
}
