//! Raw documents and result pages as returned by the content API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::CmsError;
use super::richtext::RichText;

/// Opaque locator of the next result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of query results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPage<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// Absent on the last page
    #[serde(default)]
    pub next_page: Option<Cursor>,
    #[serde(default)]
    pub prev_page: Option<Cursor>,
    pub results: Vec<T>,
}

impl<T> ApiPage<T> {
    /// A single page holding `results`, followed by `next_page`
    pub fn new(results: Vec<T>, next_page: Option<Cursor>) -> Self {
        let size = results.len() as u32;
        Self {
            page: 1,
            results_per_page: size,
            total_results_size: size,
            total_pages: 1,
            next_page,
            prev_page: None,
            results,
        }
    }

    /// Convert every result, keeping pagination metadata
    pub fn try_map<U, E, F>(self, f: F) -> Result<ApiPage<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let results = self.results.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(ApiPage {
            page: self.page,
            results_per_page: self.results_per_page,
            total_results_size: self.total_results_size,
            total_pages: self.total_pages,
            next_page: self.next_page,
            prev_page: self.prev_page,
            results,
        })
    }
}

/// A document exactly as the content API delivers it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub document_type: String,
    #[serde(default, deserialize_with = "deserialize_api_date")]
    pub first_publication_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_api_date")]
    pub last_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawDocument {
    /// The document's unique slug
    pub fn require_uid(&self) -> Result<&str, CmsError> {
        self.uid.as_deref().ok_or_else(|| CmsError::MissingField {
            document: self.id.clone(),
            field: "uid".to_string(),
        })
    }

    /// Read a text field from `data`.
    ///
    /// Key-text fields are plain strings, title fields are rich text; both
    /// are accepted. Missing or null fields read as an empty string.
    pub fn text(&self, field: &str) -> String {
        match self.data.get(field) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(value @ serde_json::Value::Array(_)) => {
                serde_json::from_value::<RichText>(value.clone())
                    .map(|rich| rich.as_text())
                    .unwrap_or_default()
            }
            _ => String::new(),
        }
    }

    /// Read the `url` of an image field
    pub fn image_url(&self, field: &str) -> Option<String> {
        self.data
            .get(field)?
            .get("url")?
            .as_str()
            .map(ToOwned::to_owned)
    }
}

/// Content API timestamps look like `2021-03-25T19:25:28+0000`
fn deserialize_api_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_api_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

pub(crate) fn parse_api_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_api_date() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(parse_api_date("2021-03-25T19:25:28+0000"), Some(expected));
        assert_eq!(parse_api_date("2021-03-25T19:25:28Z"), Some(expected));
        assert_eq!(parse_api_date("yesterday"), None);
    }

    #[test]
    fn test_deserialize_page() {
        let json = r#"{
            "page": 1,
            "results_per_page": 1,
            "total_results_size": 2,
            "total_pages": 2,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [{
                "id": "YFz",
                "uid": "como-utilizar-hooks",
                "type": "posts",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "last_publication_date": null,
                "data": {"title": "Como utilizar Hooks", "author": "Joseph Oliveira"}
            }]
        }"#;

        let page: ApiPage<RawDocument> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(
            page.next_page.as_ref().map(Cursor::as_str),
            Some("https://blog.cdn.prismic.io/api/v2/documents/search?page=2")
        );
        let doc = &page.results[0];
        assert_eq!(doc.require_uid().unwrap(), "como-utilizar-hooks");
        assert_eq!(doc.text("title"), "Como utilizar Hooks");
        assert_eq!(doc.text("subtitle"), "");
        assert!(doc.last_publication_date.is_none());
    }

    #[test]
    fn test_rich_text_title_reads_as_text() {
        let doc: RawDocument = serde_json::from_str(
            r#"{"id": "a", "data": {"title": [{"type": "heading1", "text": "Hello", "spans": []}]}}"#,
        )
        .unwrap();
        assert_eq!(doc.text("title"), "Hello");
        assert!(doc.require_uid().is_err());
    }

    #[test]
    fn test_image_url() {
        let doc: RawDocument = serde_json::from_str(
            r#"{"id": "a", "data": {"banner": {"url": "https://images.prismic.io/banner.png", "alt": null}}}"#,
        )
        .unwrap();
        assert_eq!(
            doc.image_url("banner").as_deref(),
            Some("https://images.prismic.io/banner.png")
        );
        assert_eq!(doc.image_url("missing"), None);
    }
}
