use serde::{Deserialize, Serialize};

// PascalCase aliases accept payloads from older clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, alias = "Salutation")]
    pub salutation: String,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Street")]
    pub street: String,
    #[serde(default, alias = "ZIP", alias = "Zip")]
    pub zip: String,
    #[serde(default, alias = "City")]
    pub city: String,
    #[serde(default, alias = "DocumentType")]
    pub document_type: String,
    #[serde(default, alias = "DocumentNumber")]
    pub document_number: String,
    #[serde(default, alias = "DocumentDate")]
    pub document_date: String,
    #[serde(default, alias = "CustomerNumber")]
    pub customer_number: String,
    #[serde(default, alias = "Net")]
    pub net: f64,
    #[serde(default, alias = "VATRate", alias = "VatRate")]
    pub vat_rate: f64,
    #[serde(default, alias = "VAT", alias = "Vat")]
    pub vat: f64,
    #[serde(default, alias = "Total")]
    pub total: f64,
    #[serde(default, alias = "DueDate")]
    pub due_date: String,
    // `table:name` of the item table in the template.
    #[serde(default, alias = "TableName")]
    pub table_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default, alias = "Quantity")]
    pub quantity: i64,
    #[serde(default, alias = "Unit")]
    pub unit: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(default, alias = "UnitPrice")]
    pub unit_price: f64,
    #[serde(default, alias = "TotalPrice")]
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    #[serde(alias = "Invoice")]
    pub invoice: Invoice,
    #[serde(default, alias = "Items")]
    pub items: Vec<InvoiceItem>,
}

pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

impl Invoice {
    // `vatrate` precedes `vat` so the longer token is consumed first.
    pub fn placeholder_mapping(&self, currency: &str) -> Vec<(String, String)> {
        [
            ("salutation", self.salutation.clone()),
            ("name", self.name.clone()),
            ("street", self.street.clone()),
            ("zip", self.zip.clone()),
            ("city", self.city.clone()),
            ("documenttype", self.document_type.clone()),
            ("documentnumber", self.document_number.clone()),
            ("documentdate", self.document_date.clone()),
            ("customernumber", self.customer_number.clone()),
            ("net", format_money(self.net, currency)),
            ("vatrate", format!("{:.2} %", self.vat_rate)),
            ("vat", format_money(self.vat, currency)),
            ("total", format_money(self.total, currency)),
            ("duedate", self.due_date.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

impl InvoiceItem {
    // Cell values for the item row at 1-based `position`.
    pub fn row_values(&self, position: usize, currency: &str) -> Vec<String> {
        vec![
            position.to_string(),
            self.quantity.to_string(),
            self.unit.clone(),
            self.description.clone(),
            format_money(self.unit_price, currency),
            format_money(self.total_price, currency),
        ]
    }
}
