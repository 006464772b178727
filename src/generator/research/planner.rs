//! 研究计划生成：让生成服务给出文章标题和有序的检索查询

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{DocsmithError, Result};
use crate::generator::types::{ResearchPlan, ResearchStep};
use crate::i18n::TargetLanguage;
use crate::llm::client::{GenerationClient, GenerationRequest};
use crate::utils::backoff::{RetryPolicy, with_backoff};
use crate::utils::json_extract::parse_with_fallback;

/// 研究计划生成能力
#[async_trait]
pub trait ResearchPlanner: Send + Sync {
    async fn plan(&self, topic: &str) -> Result<ResearchPlan>;
}

#[derive(Debug, Deserialize)]
struct PlanPayload {
    #[serde(rename = "articleTitle", default)]
    article_title: Option<String>,
    #[serde(rename = "researchSteps", default)]
    research_steps: Vec<StepPayload>,
}

#[derive(Debug, Deserialize)]
struct StepPayload {
    #[serde(default)]
    step: Option<Value>,
    #[serde(default)]
    query: Option<String>,
}

impl PlanPayload {
    /// 空查询的步骤直接丢弃；缺少序号时用1起的位置补上；缺少标题时用主题
    fn normalize(self, topic: &str) -> ResearchPlan {
        let article_title = self
            .article_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| topic.to_string());

        let research_steps = self
            .research_steps
            .into_iter()
            .enumerate()
            .filter_map(|(index, step)| {
                let query = step.query?.trim().to_string();
                if query.is_empty() {
                    return None;
                }
                let ordinal = step
                    .step
                    .as_ref()
                    .and_then(|v| v.as_u64().or_else(|| v.as_str()?.trim().parse().ok()))
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(index as u32 + 1);
                Some(ResearchStep { ordinal, query })
            })
            .collect();

        ResearchPlan {
            article_title,
            research_steps,
        }
    }
}

/// 解析生成服务返回的计划文本
pub fn parse_plan(raw: &str, topic: &str) -> Result<ResearchPlan> {
    parse_with_fallback::<PlanPayload>(raw)
        .map(|payload| payload.normalize(topic))
        .ok_or_else(|| DocsmithError::PlanParse {
            raw: raw.to_string(),
        })
}

/// 通过生成服务产出研究计划
pub struct LlmPlanner {
    generation: Arc<dyn GenerationClient>,
    retry: RetryPolicy,
    max_output_tokens: u32,
    timeout: Duration,
    language: TargetLanguage,
}

impl LlmPlanner {
    pub fn new(generation: Arc<dyn GenerationClient>, config: &Config) -> Self {
        Self {
            generation,
            retry: RetryPolicy::from(&config.retry),
            max_output_tokens: config.generation.plan_max_output_tokens,
            timeout: Duration::from_secs(config.generation.plan_timeout_secs),
            language: config.language,
        }
    }

    fn build_request(&self, topic: &str) -> GenerationRequest {
        let system = format!(
            "You are a professional editor. Produce a Structured Output JSON only. \
             Output schema: {{\"articleTitle\": string, \"researchSteps\": [{{\"step\": int, \"query\": string}}, ...]}}. \
             Include one step that looks for an official photo or image of the subject. {}",
            self.language.prompt_instruction()
        );
        GenerationRequest {
            system,
            user: format!("Topic: {}\nReturn only JSON.", topic),
            max_output_tokens: self.max_output_tokens,
            timeout: self.timeout,
        }
    }
}

#[async_trait]
impl ResearchPlanner for LlmPlanner {
    async fn plan(&self, topic: &str) -> Result<ResearchPlan> {
        let request = self.build_request(topic);

        // 解析失败与网络错误一样会触发重试
        with_backoff(&self.retry, "generate_plan", || async {
            let raw = self.generation.generate(&request).await?;
            parse_plan(&raw, topic)
        })
        .await
    }
}

/// 替身模式的固定计划：三个文本查询加一个图片查询
#[derive(Debug, Default, Clone)]
pub struct StandInPlanner {
    language: TargetLanguage,
}

impl StandInPlanner {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }
}

#[async_trait]
impl ResearchPlanner for StandInPlanner {
    async fn plan(&self, topic: &str) -> Result<ResearchPlan> {
        let research_steps = self
            .language
            .stand_in_queries(topic)
            .into_iter()
            .enumerate()
            .map(|(index, query)| ResearchStep {
                ordinal: index as u32 + 1,
                query,
            })
            .collect();

        Ok(ResearchPlan {
            article_title: self.language.stand_in_title(topic),
            research_steps,
        })
    }
}
