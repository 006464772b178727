//! Web检索客户端：文本检索与图片检索

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generator::types::SearchHit;

mod custom_search;

pub use custom_search::CustomSearchClient;

/// 检索服务能力。空结果是正常返回值，只有网络/HTTP错误在重试耗尽后才会返回Err
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// 文本检索，最多返回 `result_cap` 条
    async fn search_text(&self, query: &str, result_cap: usize) -> Result<Vec<SearchHit>>;

    /// 图片检索，返回最相关的一张图片地址
    async fn search_image(&self, query: &str) -> Result<Option<String>>;
}

/// 替身检索：每个文本查询返回一条固定结果，图片查询返回固定地址
#[derive(Debug, Default, Clone)]
pub struct StandInSearch;

pub const STAND_IN_IMAGE_URL: &str = "https://via.placeholder.com/800x600.png?text=Stand-in+Image";

#[async_trait]
impl WebSearch for StandInSearch {
    async fn search_text(&self, query: &str, result_cap: usize) -> Result<Vec<SearchHit>> {
        let hit = SearchHit {
            title: format!("Result for {}", query),
            snippet: format!("Snippet about {}", query),
            link: format!("https://example.com/{}", query.replace(' ', "_")),
        };
        Ok(std::iter::once(hit).take(result_cap).collect())
    }

    async fn search_image(&self, _query: &str) -> Result<Option<String>> {
        Ok(Some(STAND_IN_IMAGE_URL.to_string()))
    }
}

/// 根据配置选择检索实现
pub fn build_web_search(config: &Config) -> Arc<dyn WebSearch> {
    if config.stand_in {
        Arc::new(StandInSearch)
    } else {
        Arc::new(CustomSearchClient::new(&config.search, &config.retry))
    }
}
