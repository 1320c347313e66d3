use crate::common::{dispatch, new_template};
use crate::support::MIMETYPE;
use mcp_odt::common::errors::AppError;
use serde_json::json;

#[test]
fn inspect_template_reports_tables_and_placeholders() {
    let (_dir, template) = new_template();

    let out = dispatch(
        "inspect_template",
        json!({ "path": template.to_string_lossy() }),
    )
    .expect("inspect_template");

    assert_eq!(out["mimetype"], MIMETYPE);
    assert_eq!(
        out["entries"],
        json!([
            "mimetype",
            "content.xml",
            "styles.xml",
            "Pictures/logo.png",
            "META-INF/manifest.xml"
        ])
    );

    let tables = out["tables"].as_array().expect("tables");
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0]["name"], "Notes");
    assert_eq!(tables[1]["name"], "Listing");
    assert_eq!(tables[1]["rows"], 4);
    assert_eq!(
        tables[1]["row_styles"][1][0],
        json!({ "cell_style": "Listing.A2", "text_style": "P4" })
    );
    assert_eq!(tables[1]["row_styles"][1].as_array().expect("styles").len(), 6);

    assert_eq!(
        out["placeholders"],
        json!([
            "SALUTATION",
            "NAME",
            "STREET",
            "ZIP",
            "CITY",
            "DOCUMENTTYPE",
            "DOCUMENTNUMBER",
            "DOCUMENTDATE",
            "CUSTOMERNUMBER",
            "NET",
            "VATRATE",
            "VAT",
            "TOTAL",
            "DUEDATE"
        ])
    );
}

#[test]
fn inspect_template_does_not_modify_the_file() {
    let (_dir, template) = new_template();
    let before = std::fs::read(&template).expect("read");

    dispatch(
        "inspect_template",
        json!({ "path": template.to_string_lossy() }),
    )
    .expect("inspect_template");

    assert_eq!(std::fs::read(&template).expect("read"), before);
}

#[test]
fn inspect_template_rejects_non_zip_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plain.odt");
    std::fs::write(&path, "just text").expect("write");

    let err = dispatch("inspect_template", json!({ "path": path.to_string_lossy() }))
        .expect_err("not a package");
    assert!(matches!(err, AppError::InvalidOdtFormat(_)));
}
