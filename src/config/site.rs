//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub languages_dir: String,

    // Date format (Moment.js tokens)
    pub date_format: String,

    // Content service
    #[serde(default)]
    pub cms: CmsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            language: "pt-BR".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            languages_dir: "languages".to_string(),

            date_format: "DD MMM YYYY".to_string(),

            cms: CmsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Content service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// API entry point, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub document_type: String,
    /// Posts on the first listing page
    pub page_size: usize,
    /// Posts rendered at build time; the rest render on request
    pub static_paths_page_size: usize,
    /// Fields fetched for the listing
    pub fetch_fields: Vec<String>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            document_type: "posts".to_string(),
            page_size: 20,
            static_paths_page_size: 2,
            fetch_fields: vec![
                "title".to_string(),
                "subtitle".to_string(),
                "author".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.cms.document_type, "posts");
        assert_eq!(config.cms.static_paths_page_size, 2);
        assert_eq!(config.cms.fetch_fields, vec!["title", "subtitle", "author"]);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
language: en
cms:
  endpoint: https://my-blog.cdn.prismic.io/api/v2
  page_size: 5
analytics_id: UA-1
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.language, "en");
        assert_eq!(config.cms.endpoint, "https://my-blog.cdn.prismic.io/api/v2");
        assert_eq!(config.cms.page_size, 5);
        assert_eq!(config.cms.document_type, "posts");
        assert_eq!(config.date_format, "DD MMM YYYY");
        assert!(config.extra.contains_key("analytics_id"));
    }
}
