use quick_xml::escape::escape;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// `$<text:span text:style-name="T8">NET</text:span>`: an editor restyled the token part.
static STYLED_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\$<text:span text:style-name="(.*?)">(.*?)</text:span>"#)
        .expect("styled token pattern is valid")
});

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Z][A-Z0-9_]*)").expect("token pattern is valid"));

#[derive(Debug, Clone)]
pub struct Replacer {
    date_keys: Vec<String>,
}

impl Replacer {
    pub fn new(date_keys: Vec<String>) -> Self {
        Self { date_keys }
    }

    // Strips span wrappers that split a placeholder from its `$`.
    pub fn canonicalize(xml: &str) -> String {
        let unwrapped = STYLED_TOKEN.replace_all(xml, r"\$$ ${2}");
        unwrapped.replace(r"\$ ", "$")
    }

    // Replaces `$KEY` with each value, in mapping order. Values are XML-escaped.
    pub fn replace_values(&self, xml: &str, mapping: &[(String, String)]) -> String {
        let mut xml = Self::canonicalize(xml);
        for (key, value) in mapping {
            let value = if self.is_date_key(key) {
                reformat_date(value)
            } else {
                value.clone()
            };
            let token = format!("${}", key.to_uppercase());
            debug!("replacing {token}");
            xml = xml.replace(&token, &escape(&value));
        }
        xml
    }

    // Placeholder names (without `$`) present after canonicalization, in first-seen order.
    pub fn placeholders(xml: &str) -> Vec<String> {
        let canonical = Self::canonicalize(xml);
        let mut found: Vec<String> = Vec::new();
        for caps in TOKEN.captures_iter(&canonical) {
            let name = caps[1].to_string();
            if !found.contains(&name) {
                found.push(name);
            }
        }
        found
    }

    fn is_date_key(&self, key: &str) -> bool {
        self.date_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

// `YYYY-MM-DD` to `DD.MM.YYYY`; anything else passes through unchanged.
pub fn reformat_date(value: &str) -> String {
    let parts: Vec<&str> = value.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}.{month}.{year}"),
        _ => value.to_string(),
    }
}
