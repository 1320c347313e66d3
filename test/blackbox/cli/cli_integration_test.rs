use crate::common::new_template;
use crate::support::{row_texts, sample_invoice, sample_items};
use mcp_odt::common::json::JsonUtil;
use serde_json::Value;
use std::process::Command;

fn render_command(template: &std::path::Path, output: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_mcp-odt"));
    command
        .arg("render")
        .arg("--template")
        .arg(template)
        .arg("--output")
        .arg(output)
        .arg("--invoice")
        .arg(JsonUtil::to_base64(&sample_invoice()).expect("invoice"))
        .arg("--items")
        .arg(JsonUtil::to_base64(&sample_items()).expect("items"));
    command
}

#[test]
fn cli_render_writes_odt_and_prints_summary() {
    let (dir, template) = new_template();
    let output = dir.path().join("cli.odt");

    let out = render_command(&template, &output).output().expect("run cli");
    assert!(out.status.success());

    let summary: Value =
        serde_json::from_str(String::from_utf8(out.stdout).expect("utf-8").trim()).expect("json");
    assert_eq!(summary["rows_inserted"], 2);
    assert_eq!(row_texts(&output, "Listing").len(), 6);
}

#[test]
fn cli_render_exits_with_two_when_conversion_fails() {
    let (dir, template) = new_template();
    let output = dir.path().join("cli.pdf");

    let out = render_command(&template, &output)
        .env("MCP_ODT_CONVERTER", "/nonexistent/soffice")
        .output()
        .expect("run cli");
    assert_eq!(out.status.code(), Some(2));
    assert!(dir.path().join("cli.odt").is_file());
    assert!(!output.exists());
}

#[test]
fn cli_render_exits_with_one_on_render_failure() {
    let (dir, template) = new_template();
    let output = dir.path().join("cli.odt");

    let out = render_command(&template, &output)
        .arg("--footer-rows")
        .arg("0")
        .output()
        .expect("run cli");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("footer_rows"));
    assert!(!output.exists());
}

#[cfg(unix)]
mod converter_failures {
    use super::render_command;
    use crate::common::new_template;
    use crate::support::{
        write_script, FAILING_CONVERTER, HANGING_CONVERTER, SILENT_CONVERTER, WORKING_CONVERTER,
    };
    use serde_json::Value;

    fn run_with_converter(script: &str) -> (tempfile::TempDir, std::process::Output) {
        let (dir, template) = new_template();
        let converter = write_script(dir.path(), "fake-soffice", script);
        let output = render_command(&template, &dir.path().join("cli.pdf"))
            .env("MCP_ODT_CONVERTER", &converter)
            .env("MCP_ODT_CONVERT_TIMEOUT_SECS", "1")
            .output()
            .expect("run cli");
        (dir, output)
    }

    #[test]
    fn cli_render_to_pdf_reports_both_files() {
        let (dir, out) = run_with_converter(WORKING_CONVERTER);
        assert!(out.status.success());

        let summary: Value = serde_json::from_str(
            String::from_utf8(out.stdout).expect("utf-8").trim(),
        )
        .expect("json");
        assert!(summary["pdf"].as_str().expect("pdf").ends_with("cli.pdf"));
        assert!(dir.path().join("cli.pdf").is_file());
        assert!(dir.path().join("cli.odt").is_file());
    }

    #[test]
    fn cli_keeps_odt_when_converter_exits_non_zero() {
        let (dir, out) = run_with_converter(FAILING_CONVERTER);
        assert_eq!(out.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&out.stderr).contains("exited with"));
        assert!(dir.path().join("cli.odt").is_file());
    }

    #[test]
    fn cli_keeps_odt_when_converter_times_out() {
        let (dir, out) = run_with_converter(HANGING_CONVERTER);
        assert_eq!(out.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&out.stderr).contains("timed out after 1s"));
        assert!(dir.path().join("cli.odt").is_file());
    }

    #[test]
    fn cli_keeps_odt_when_converter_writes_no_pdf() {
        let (dir, out) = run_with_converter(SILENT_CONVERTER);
        assert_eq!(out.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&out.stderr).contains("converted pdf not found"));
        assert!(dir.path().join("cli.odt").is_file());
        assert!(!dir.path().join("cli.pdf").exists());
    }
}
