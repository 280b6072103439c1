//! Internationalization (i18n) support
//!
//! Interface labels ship for `pt-BR` and `en`. A site may override or add
//! labels with flat YAML files in its languages directory, one per language
//! (`languages/pt-BR.yml`).

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const PT_BR: &[(&str, &str)] = &[
    ("load_more", "Carregar mais posts"),
    ("loading", "Carregando..."),
    ("date_placeholder", "Data de publicação"),
    ("author_placeholder", "Autor"),
    ("read_time_placeholder", "Tempo de leitura"),
    ("minutes", "min"),
    ("logo_alt", "logo"),
    ("banner_alt", "banner"),
];

const EN: &[(&str, &str)] = &[
    ("load_more", "Load more posts"),
    ("loading", "Loading..."),
    ("date_placeholder", "Publication date"),
    ("author_placeholder", "Author"),
    ("read_time_placeholder", "Reading time"),
    ("minutes", "min"),
    ("logo_alt", "logo"),
    ("banner_alt", "banner"),
];

/// Labels used by the built-in templates
#[derive(Debug, Clone, Serialize)]
pub struct Labels {
    pub load_more: String,
    pub loading: String,
    pub date_placeholder: String,
    pub author_placeholder: String,
    pub read_time_placeholder: String,
    pub minutes: String,
    pub logo_alt: String,
    pub banner_alt: String,
}

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, String>>,
}

impl I18n {
    /// Create a handler with the built-in tables
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        translations.insert("pt-BR".to_string(), table(PT_BR));
        translations.insert("en".to_string(), table(EN));
        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language files from a directory
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    let labels = self.translations.entry(lang.to_string()).or_default();
                    for (key, value) in data {
                        if let Some(text) = yaml_value_to_string(&value) {
                            labels.insert(key, text);
                        }
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key, falling back to English, then the key
    pub fn get(&self, key: &str) -> String {
        [self.language.as_str(), "en"]
            .iter()
            .find_map(|lang| self.translations.get(*lang)?.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// All labels the templates need
    pub fn labels(&self) -> Labels {
        Labels {
            load_more: self.get("load_more"),
            loading: self.get("loading"),
            date_placeholder: self.get("date_placeholder"),
            author_placeholder: self.get("author_placeholder"),
            read_time_placeholder: self.get("read_time_placeholder"),
            minutes: self.get("minutes"),
            logo_alt: self.get("logo_alt"),
            banner_alt: self.get("banner_alt"),
        }
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("pt-BR")
    }
}

fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Convert a scalar YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
