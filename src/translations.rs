//! UI strings per language, read from `assets/translations.csv`.

use csv::ReaderBuilder;
use std::collections::HashMap;

pub const DEFAULT_LANGUAGE: &str = "en";

pub struct Translations {
    values: HashMap<String, String>,
    languages: Vec<String>,
}

impl Translations {
    fn from_text(csv_text: &str) -> Self {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv_text.as_bytes());

        // First header column holds the keys.
        let languages: Vec<String> = match rdr.headers() {
            Ok(headers) => headers.iter().skip(1).map(str::to_string).collect(),
            Err(_) => Vec::new(),
        };

        let mut values = HashMap::new();
        for record in rdr.records().flatten() {
            let mut fields = record.iter();
            let Some(key) = fields.next() else {
                continue;
            };
            for (language, text) in languages.iter().zip(fields) {
                values.insert(format!("{language}:{key}"), text.to_string());
            }
        }

        Self { values, languages }
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    /// Text for `key` in `language`, falling back to English and then to the
    /// key itself.
    pub fn get(&self, language: &str, key: &str) -> String {
        self.values
            .get(&format!("{language}:{key}"))
            .or_else(|| self.values.get(&format!("{DEFAULT_LANGUAGE}:{key}")))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// `get` with `{name}` placeholders substituted.
    pub fn format(&self, language: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.get(language, key), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::from_text(include_str!("../assets/translations.csv"))
    }
}
