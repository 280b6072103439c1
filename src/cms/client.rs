//! HTTP client for the Prismic REST API (v2)

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::document::{ApiPage, Cursor, RawDocument};
use super::error::CmsError;
use super::{ContentSource, QueryOptions};

/// Content API entry point (`GET {endpoint}`)
#[derive(Debug, Deserialize)]
struct ApiInfo {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// Client for a Prismic repository, e.g. `https://my-blog.cdn.prismic.io/api/v2`
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http: Client,
    endpoint: String,
}

impl PrismicClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve the ref of the currently published content
    async fn master_ref(&self) -> Result<String, CmsError> {
        let info: ApiInfo = self.get_json(self.http.get(&self.endpoint), &self.endpoint).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(CmsError::NoMasterRef)
    }

    /// Run a predicate search against the master ref
    async fn search(
        &self,
        predicate: String,
        extra: Vec<(&'static str, String)>,
    ) -> Result<ApiPage<RawDocument>, CmsError> {
        let master = self.master_ref().await?;
        let url = format!("{}/documents/search", self.endpoint);

        let mut params = vec![("ref", master), ("q", predicate)];
        params.extend(extra);

        tracing::debug!(url = %url, params = ?params, "querying content API");
        self.get_json(self.http.get(&url).query(&params), &url).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, CmsError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query(&self, options: &QueryOptions) -> Result<ApiPage<RawDocument>, CmsError> {
        let mut extra = Vec::new();
        if !options.fetch.is_empty() {
            let fields: Vec<String> = options
                .fetch
                .iter()
                .map(|f| format!("{}.{}", options.document_type, f))
                .collect();
            extra.push(("fetch", fields.join(",")));
        }
        if let Some(size) = options.page_size {
            extra.push(("pageSize", size.to_string()));
        }

        self.search(type_predicate(&options.document_type), extra)
            .await
    }

    async fn get_by_uid(
        &self,
        document_type: &str,
        uid: &str,
    ) -> Result<Option<RawDocument>, CmsError> {
        let page = self
            .search(uid_predicate(document_type, uid), vec![("pageSize", "1".to_string())])
            .await?;
        Ok(page.results.into_iter().next())
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<ApiPage<RawDocument>, CmsError> {
        tracing::debug!(cursor = %cursor, "fetching next page");
        self.get_json(self.http.get(cursor.as_str()), cursor.as_str())
            .await
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn type_predicate(document_type: &str) -> String {
    format!("[[at(document.type, {})]]", quote(document_type))
}

fn uid_predicate(document_type: &str, uid: &str) -> String {
    format!("[[at(my.{}.uid, {})]]", document_type, quote(uid))
}
