//! Post listing aggregation
//!
//! A [`ListingState`] is the ordered list of summaries fetched so far plus
//! the cursor of the next page. States are values: every change goes through
//! [`ListingState::apply_page`], which returns a successor with the page
//! appended and the cursor replaced.
//!
//! Pages are appended as delivered. Summaries are never reordered or
//! deduplicated, and nothing serializes concurrent `load_more` calls made
//! from the same state; the caller keeps whichever successor it stores last.

use crate::cms::{ApiPage, CmsError, ContentSource, Cursor, RawDocument};

use super::post::PostSummary;

/// A page of post summaries
pub type PostsPage = ApiPage<PostSummary>;

/// Summaries loaded so far and where to continue
#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    posts: Vec<PostSummary>,
    cursor: Option<Cursor>,
    version: u64,
}

impl ListingState {
    /// Start from the first page
    pub fn initialize(first_page: PostsPage) -> Self {
        Self {
            posts: first_page.results,
            cursor: first_page.next_page,
            version: 0,
        }
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Number of pages applied since initialization
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a next page exists; drives the "load more" control
    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Append `page` and take over its cursor
    pub fn apply_page(&self, page: PostsPage) -> Self {
        let mut posts = Vec::with_capacity(self.posts.len() + page.results.len());
        posts.extend_from_slice(&self.posts);
        posts.extend(page.results);

        Self {
            posts,
            cursor: page.next_page,
            version: self.version + 1,
        }
    }

    /// Fetch the page under the cursor and append it.
    ///
    /// Calling this without a cursor is a caller error; it performs no fetch
    /// and returns the state unchanged. Fetch failures are returned as-is:
    /// there is no retry and no timeout.
    pub async fn load_more(&self, source: &dyn ContentSource) -> Result<Self, CmsError> {
        let Some(cursor) = &self.cursor else {
            tracing::debug!("load_more called on an exhausted listing; ignoring");
            return Ok(self.clone());
        };

        let raw = source.fetch_page(cursor).await?;
        let page = raw.try_map(|doc: RawDocument| PostSummary::from_document(&doc))?;
        tracing::debug!(
            fetched = page.results.len(),
            more = page.next_page.is_some(),
            "loaded next listing page"
        );

        Ok(self.apply_page(page))
    }
}
