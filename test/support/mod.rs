#![allow(dead_code)]

use mcp_odt::odt::document::{Document, Element, Node};
use mcp_odt::odt::invoice::{Invoice, InvoiceItem};
use mcp_odt::odt::table::{TableLocator, TABLE_ROW};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const MIMETYPE: &str = "application/vnd.oasis.opendocument.text";
pub const LOGO_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

const HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" office:version="1.3">"#;

// Item table `Listing`: one header row plus a three-row totals footer. The due date is split by a span.
pub fn content_xml() -> String {
    format!(
        r#"{HEAD}
<office:body>
<office:text>
<text:p text:style-name="P1">$SALUTATION $NAME</text:p>
<text:p text:style-name="P1">$STREET, $ZIP $CITY</text:p>
<text:p text:style-name="P2">$DOCUMENTTYPE $DOCUMENTNUMBER of $DOCUMENTDATE, customer $CUSTOMERNUMBER</text:p>
<table:table table:name="Notes"><table:table-row><table:table-cell table:style-name="Notes.A1"><text:p text:style-name="P1">note</text:p></table:table-cell></table:table-row></table:table>
<table:table table:name="Listing" table:style-name="Listing">
<table:table-column table:style-name="Listing.A" table:number-columns-repeated="6"/>
{header}
{net}
{vat}
{total}
</table:table>
<text:p text:style-name="P5">Net $NET, VAT $VATRATE = $VAT, total $TOTAL</text:p>
<text:p text:style-name="P5">Due on $<text:span text:style-name="T8">DUEDATE</text:span></text:p>
</office:text>
</office:body>
</office:document-content>"#,
        header = row("A1", "P3", &["Pos", "Qty", "Unit", "Description", "Price", "Total"]),
        net = row("A2", "P4", &["", "", "", "Net", "", "sum"]),
        vat = row("A3", "P4", &["", "", "", "VAT", "", "tax"]),
        total = row("A4", "P4", &["", "", "", "Total", "", "gross"]),
    )
}

// A table row with six styled cells (`Listing.A<n>`..`Listing.F<n>`).
pub fn row(suffix: &str, text_style: &str, values: &[&str]) -> String {
    let mut out = String::from("<table:table-row>");
    for (i, value) in values.iter().enumerate() {
        let col = (b'A' + i as u8) as char;
        let number = &suffix[1..];
        out.push_str(&format!(
            r#"<table:table-cell table:style-name="Listing.{col}{number}" office:value-type="string"><text:p text:style-name="{text_style}">{value}</text:p></table:table-cell>"#
        ));
    }
    out.push_str("</table:table-row>");
    out
}

// Wraps `body` (placed inside `office:text`) into a full content document.
pub fn content_with_body(body: &str) -> String {
    format!("{HEAD}<office:body><office:text>{body}</office:text></office:body></office:document-content>")
}

pub fn write_template(path: &Path) {
    write_template_with_content(path, &content_xml());
}

pub fn write_template_with_content(path: &Path, content: &str) {
    write_package(
        path,
        vec![
            ("mimetype", CompressionMethod::Stored, MIMETYPE.as_bytes().to_vec()),
            ("content.xml", CompressionMethod::Deflated, content.as_bytes().to_vec()),
            (
                "styles.xml",
                CompressionMethod::Deflated,
                br#"<?xml version="1.0" encoding="UTF-8"?><office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"/>"#.to_vec(),
            ),
            ("Pictures/logo.png", CompressionMethod::Stored, LOGO_BYTES.to_vec()),
            (
                "META-INF/manifest.xml",
                CompressionMethod::Deflated,
                br#"<?xml version="1.0" encoding="UTF-8"?><manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"/>"#.to_vec(),
            ),
        ],
    );
}

pub fn write_package(path: &Path, entries: Vec<(&str, CompressionMethod, Vec<u8>)>) {
    let file = File::create(path).expect("create package");
    let mut zip = ZipWriter::new(file);
    for (name, method, bytes) in entries {
        zip.start_file(name, SimpleFileOptions::default().compression_method(method))
            .expect("start file");
        zip.write_all(&bytes).expect("write entry");
    }
    zip.finish().expect("finish package");
}

pub fn entry_names(path: &Path) -> Vec<String> {
    let zip = ZipArchive::new(File::open(path).expect("open")).expect("zip");
    zip.file_names().map(str::to_string).collect()
}

pub fn read_entry(path: &Path, name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(File::open(path).expect("open")).expect("zip");
    let mut entry = zip.by_name(name).expect("entry");
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).expect("read entry");
    bytes
}

pub fn read_content(path: &Path) -> String {
    String::from_utf8(read_entry(path, "content.xml")).expect("utf-8 content")
}

pub fn table_rows(doc: &Document, name: &str) -> Vec<Element> {
    TableLocator::find_table_by_name(doc, name)
        .expect("table present")
        .child_elements()
        .filter(|e| e.name == TABLE_ROW)
        .cloned()
        .collect()
}

// Cell texts per row of table `name` in the package at `path`.
pub fn row_texts(path: &Path, name: &str) -> Vec<Vec<String>> {
    let doc = Document::parse_str(&read_content(path)).expect("parse output");
    table_rows(&doc, name)
        .iter()
        .map(|row| row.child_elements().map(text_of).collect())
        .collect()
}

// Concatenated text of `element` and its descendants.
pub fn text_of(element: &Element) -> String {
    let mut out = String::new();
    for child in &element.children {
        match child {
            Node::Text(t) | Node::CData(t) => out.push_str(t),
            Node::Element(e) => out.push_str(&text_of(e)),
            _ => {}
        }
    }
    out
}

pub fn sample_invoice() -> Invoice {
    Invoice {
        salutation: "Mr.".to_string(),
        name: "John Doe".to_string(),
        street: "123 Main St".to_string(),
        zip: "12345".to_string(),
        city: "Anytown".to_string(),
        document_type: "Invoice".to_string(),
        document_number: "1000251".to_string(),
        document_date: "2025-05-01".to_string(),
        customer_number: "C123456".to_string(),
        net: 36.0,
        vat_rate: 12.0,
        vat: 4.32,
        total: 40.32,
        due_date: "2025-06-01".to_string(),
        table_name: "Listing".to_string(),
    }
}

pub fn sample_items() -> Vec<InvoiceItem> {
    vec![
        InvoiceItem {
            quantity: 2,
            unit: "L".to_string(),
            description: "Water".to_string(),
            unit_price: 15.0,
            total_price: 30.0,
        },
        InvoiceItem {
            quantity: 3,
            unit: "pcs".to_string(),
            description: "Shoes".to_string(),
            unit_price: 2.0,
            total_price: 6.0,
        },
    ]
}

// Stand-ins for the office converter, invoked as
// `<script> --headless --convert-to pdf --outdir <dir> <odt>`.
pub const WORKING_CONVERTER: &str = r#"name=$(basename "$6" .odt)
printf '%%PDF-1.4\n' > "$5/$name.pdf""#;
pub const FAILING_CONVERTER: &str = r#"echo "source file could not be loaded" >&2
exit 1"#;
pub const NOISY_CONVERTER: &str = r#"head -c 200000 /dev/zero | tr '\0' x >&2
exit 1"#;
pub const HANGING_CONVERTER: &str = "exec sleep 30";
pub const SILENT_CONVERTER: &str = "exit 0";

#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}
