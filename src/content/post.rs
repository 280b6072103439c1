//! Post models projected from raw CMS documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cms::{CmsError, RawDocument, RichText};

/// A post as shown on the listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Project a document onto the listing fields, ignoring everything else
    pub fn from_document(doc: &RawDocument) -> Result<Self, CmsError> {
        Ok(Self {
            uid: doc.require_uid()?.to_string(),
            first_publication_date: doc.first_publication_date,
            title: doc.text("title"),
            subtitle: doc.text("subtitle"),
            author: doc.text("author"),
        })
    }
}

/// One section of a post body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub heading: String,
    #[serde(default)]
    pub body: RichText,
}

/// A full post, as rendered on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub content: Vec<ContentBlock>,
}

impl PostDetail {
    pub fn from_document(doc: &RawDocument) -> Result<Self, CmsError> {
        let content = match doc.data.get("content") {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())?,
            _ => Vec::new(),
        };

        Ok(Self {
            uid: doc.require_uid()?.to_string(),
            first_publication_date: doc.first_publication_date,
            title: doc.text("title"),
            subtitle: doc.text("subtitle"),
            banner_url: doc.image_url("banner"),
            author: doc.text("author"),
            content,
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> RawDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_summary_projects_listing_fields_only() {
        let doc = document(
            r#"{
                "id": "X1",
                "uid": "criando-um-app-cra-do-zero",
                "type": "posts",
                "first_publication_date": "2021-03-19T19:25:28+0000",
                "data": {
                    "title": "Criando um app CRA do zero",
                    "subtitle": "Tudo sobre como criar a sua primeira aplicação",
                    "author": "Danilo Vieira",
                    "content": [{"heading": "x", "body": []}]
                }
            }"#,
        );

        let summary = PostSummary::from_document(&doc).unwrap();
        assert_eq!(summary.uid, "criando-um-app-cra-do-zero");
        assert_eq!(summary.title, "Criando um app CRA do zero");
        assert_eq!(summary.author, "Danilo Vieira");
        assert!(summary.first_publication_date.is_some());
    }

    #[test]
    fn test_summary_requires_uid() {
        let doc = document(r#"{"id": "X1", "data": {"title": "t"}}"#);
        assert!(matches!(
            PostSummary::from_document(&doc),
            Err(CmsError::MissingField { .. })
        ));
    }

    #[test]
    fn test_detail_from_document() {
        let doc = document(
            r#"{
                "id": "X2",
                "uid": "como-utilizar-hooks",
                "first_publication_date": "2021-03-15T19:25:28+0000",
                "data": {
                    "title": "Como utilizar Hooks",
                    "subtitle": "Pensando em sincronização em vez de ciclos de vida",
                    "author": "Joseph Oliveira",
                    "banner": {"url": "https://images.prismic.io/banner.png"},
                    "content": [
                        {"heading": "Proin et varius", "body": [{"type": "paragraph", "text": "Lorem ipsum", "spans": []}]},
                        {"heading": null, "body": []}
                    ]
                }
            }"#,
        );

        let detail = PostDetail::from_document(&doc).unwrap();
        assert_eq!(detail.content.len(), 2);
        assert_eq!(detail.content[0].heading, "Proin et varius");
        assert_eq!(detail.content[0].body.as_text(), "Lorem ipsum");
        assert_eq!(detail.content[1].heading, "");
        assert_eq!(
            detail.banner_url.as_deref(),
            Some("https://images.prismic.io/banner.png")
        );
    }

    #[test]
    fn test_detail_without_content() {
        let doc = document(r#"{"id": "X3", "uid": "vazio", "data": {"title": "Vazio"}}"#);
        let detail = PostDetail::from_document(&doc).unwrap();
        assert!(detail.content.is_empty());
        assert!(detail.banner_url.is_none());
    }
}
