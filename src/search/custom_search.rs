//! Custom Search JSON API 客户端

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::WebSearch;
use crate::config::{RetryConfig, SearchConfig};
use crate::error::{DocsmithError, Result};
use crate::generator::types::SearchHit;
use crate::utils::backoff::{RetryPolicy, with_backoff};

/// 接口单次最多返回10条
const MAX_RESULTS_PER_REQUEST: usize = 10;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    image: Option<ImageMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageMeta {
    thumbnail_link: Option<String>,
    context_link: Option<String>,
}

impl SearchItem {
    fn into_hit(self) -> SearchHit {
        SearchHit {
            title: self.title.unwrap_or_default(),
            snippet: self.snippet.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
        }
    }

    /// 直链优先，其次缩略图，最后是所在页面
    fn best_image_url(self) -> Option<String> {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        if let Some(link) = non_empty(self.link) {
            return Some(link);
        }
        let image = self.image?;
        non_empty(image.thumbnail_link).or_else(|| non_empty(image.context_link))
    }
}

#[derive(Clone)]
pub struct CustomSearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CustomSearchClient {
    pub fn new(config: &SearchConfig, retry: &RetryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            retry: RetryPolicy::from(retry),
        }
    }

    async fn fetch(&self, params: &[(&str, String)]) -> Result<SearchResponse> {
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("cx", self.engine_id.clone()),
        ];
        query.extend(params.iter().cloned());

        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocsmithError::HttpStatus {
                service: "search service",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SearchResponse>().await?)
    }
}

#[async_trait]
impl WebSearch for CustomSearchClient {
    async fn search_text(&self, query: &str, result_cap: usize) -> Result<Vec<SearchHit>> {
        let num = result_cap.clamp(1, MAX_RESULTS_PER_REQUEST);
        let params = [("q", query.to_string()), ("num", num.to_string())];

        let response = with_backoff(&self.retry, "search_text", || self.fetch(&params)).await?;

        Ok(response
            .items
            .into_iter()
            .take(result_cap)
            .map(SearchItem::into_hit)
            .collect())
    }

    async fn search_image(&self, query: &str) -> Result<Option<String>> {
        let params = [
            ("q", query.to_string()),
            ("searchType", "image".to_string()),
            ("num", "1".to_string()),
        ];

        let response = with_backoff(&self.retry, "search_image", || self.fetch(&params)).await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(SearchItem::best_image_url))
    }
}
