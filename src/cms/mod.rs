//! Content service module - talks to the headless CMS
//!
//! [`ContentSource`] is the seam between the site and the content API:
//! [`PrismicClient`] implements it over HTTP, tests implement it in memory.

mod client;
mod document;
mod error;
pub mod richtext;

use async_trait::async_trait;

pub use client::PrismicClient;
pub use document::{ApiPage, Cursor, RawDocument};
pub use error::CmsError;
pub use richtext::RichText;

use crate::config::CmsConfig;

/// Parameters of a query by document type
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub document_type: String,
    /// Data fields to include; empty means all
    pub fetch: Vec<String>,
    pub page_size: Option<usize>,
}

impl QueryOptions {
    /// Query returning every field of `document_type`
    pub fn all(document_type: &str) -> Self {
        Self {
            document_type: document_type.to_string(),
            fetch: Vec::new(),
            page_size: None,
        }
    }

    /// First page of the post listing, restricted to the summary fields
    pub fn listing(config: &CmsConfig) -> Self {
        Self {
            document_type: config.document_type.clone(),
            fetch: config.fetch_fields.clone(),
            page_size: Some(config.page_size),
        }
    }

    /// Posts pre-rendered at build time
    pub fn static_paths(config: &CmsConfig) -> Self {
        Self {
            document_type: config.document_type.clone(),
            fetch: Vec::new(),
            page_size: Some(config.static_paths_page_size),
        }
    }
}

/// Read access to the content store
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Query documents by type
    async fn query(&self, options: &QueryOptions) -> Result<ApiPage<RawDocument>, CmsError>;

    /// Fetch one document by type and uid; `None` when it does not exist
    async fn get_by_uid(
        &self,
        document_type: &str,
        uid: &str,
    ) -> Result<Option<RawDocument>, CmsError>;

    /// Fetch the page a cursor points at
    async fn fetch_page(&self, cursor: &Cursor) -> Result<ApiPage<RawDocument>, CmsError>;
}
