//! 文章生成：把汇总的研究资料交给生成服务写成结构化文章

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{DocsmithError, Result};
use crate::generator::types::{AggregatedRecord, Article, Section};
use crate::i18n::TargetLanguage;
use crate::llm::client::{GenerationClient, GenerationRequest};
use crate::utils::backoff::{RetryPolicy, with_backoff};
use crate::utils::json_extract::parse_with_fallback;

/// 文章末尾图片占位节使用的标题
pub const IMAGE_PLACEHOLDER: &str = "ImagePlaceholder";

/// 文章生成能力
#[async_trait]
pub trait ArticleComposer: Send + Sync {
    async fn compose(&self, record: &AggregatedRecord) -> Result<Article>;
}

#[derive(Debug, Deserialize)]
struct ArticlePayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    sections: Vec<Section>,
}

/// 解析生成服务返回的文章文本，标题缺失时使用 `fallback_title`
pub fn parse_article(raw: &str, fallback_title: &str) -> Result<Article> {
    let payload =
        parse_with_fallback::<ArticlePayload>(raw).ok_or_else(|| DocsmithError::ArticleParse {
            raw: raw.to_string(),
        })?;

    let title = payload
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());

    Ok(Article {
        title,
        sections: payload.sections,
    })
}

pub struct LlmComposer {
    generation: Arc<dyn GenerationClient>,
    retry: RetryPolicy,
    max_output_tokens: u32,
    timeout: Duration,
    language: TargetLanguage,
}

impl LlmComposer {
    pub fn new(generation: Arc<dyn GenerationClient>, config: &Config) -> Self {
        Self {
            generation,
            retry: RetryPolicy::from(&config.retry),
            max_output_tokens: config.generation.article_max_output_tokens,
            timeout: Duration::from_secs(config.generation.article_timeout_secs),
            language: config.language,
        }
    }

    fn build_request(&self, record: &AggregatedRecord) -> Result<GenerationRequest> {
        let system = format!(
            "Using the provided data, write a coherent article: an introduction, then headed sections. \
             Separate paragraphs inside a section body with a blank line. \
             Finish with a section whose heading is exactly \"{}\" and whose body is the imageUrl from the data, \
             or an empty string if there is none. \
             Return only JSON: {{\"title\": string, \"sections\": [{{\"heading\": string, \"body\": string}}, ...]}}. {}",
            IMAGE_PLACEHOLDER,
            self.language.prompt_instruction()
        );
        let data = serde_json::to_string_pretty(record)?;

        Ok(GenerationRequest {
            system,
            user: format!("DATA:\n{}", data),
            max_output_tokens: self.max_output_tokens,
            timeout: self.timeout,
        })
    }

    fn fallback_title<'a>(&self, record: &'a AggregatedRecord) -> &'a str {
        if record.article_title.trim().is_empty() {
            self.language.default_article_title()
        } else {
            &record.article_title
        }
    }
}

#[async_trait]
impl ArticleComposer for LlmComposer {
    async fn compose(&self, record: &AggregatedRecord) -> Result<Article> {
        let request = self.build_request(record)?;
        let fallback_title = self.fallback_title(record);

        with_backoff(&self.retry, "generate_article", || async {
            let raw = self.generation.generate(&request).await?;
            parse_article(&raw, fallback_title)
        })
        .await
    }
}

/// 替身模式的固定文章：引言、事实、结论，加图片占位节
#[derive(Debug, Default, Clone)]
pub struct StandInComposer {
    language: TargetLanguage,
}

impl StandInComposer {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }
}

#[async_trait]
impl ArticleComposer for StandInComposer {
    async fn compose(&self, record: &AggregatedRecord) -> Result<Article> {
        let [intro, facts, conclusion] = self.language.stand_in_headings();
        let mut facts_body = self.language.stand_in_facts_lead().to_string();
        for fact in &record.fact_summaries {
            facts_body.push('\n');
            facts_body.push_str(fact);
        }

        let title = if record.article_title.trim().is_empty() {
            self.language.default_article_title().to_string()
        } else {
            record.article_title.clone()
        };

        Ok(Article {
            title,
            sections: vec![
                Section {
                    heading: intro.to_string(),
                    body: self.language.stand_in_introduction(&record.topic),
                },
                Section {
                    heading: facts.to_string(),
                    body: facts_body,
                },
                Section {
                    heading: conclusion.to_string(),
                    body: self.language.stand_in_conclusion().to_string(),
                },
                Section {
                    heading: IMAGE_PLACEHOLDER.to_string(),
                    body: record.image_url.clone().unwrap_or_default(),
                },
            ],
        })
    }
}
