pub mod convert_to_pdf;
pub mod health;
pub mod inspect_template;
pub mod render_invoice;
pub mod render_invoice_base64;
