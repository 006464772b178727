//! 逐个执行研究步骤，汇总检索结果
//!
//! 单个步骤失败只会记录为错误结果，不会中断整体流程。

use std::sync::Arc;

use crate::config::MAX_FACT_SUMMARIES;
use crate::generator::research::classifier::QueryClassifier;
use crate::generator::types::{
    AggregatedRecord, CollectedEntry, ResearchPlan, ResearchResult, StepKind,
};
use crate::search::WebSearch;

pub struct Aggregator {
    search: Arc<dyn WebSearch>,
    classifier: Arc<dyn QueryClassifier>,
    results_per_query: usize,
    fact_summary_cap: usize,
}

impl Aggregator {
    pub fn new(
        search: Arc<dyn WebSearch>,
        classifier: Arc<dyn QueryClassifier>,
        results_per_query: usize,
        fact_summary_cap: usize,
    ) -> Self {
        Self {
            search,
            classifier,
            results_per_query,
            fact_summary_cap: fact_summary_cap.min(MAX_FACT_SUMMARIES),
        }
    }

    /// 按计划顺序执行全部步骤，`collected` 与步骤一一对应
    pub async fn aggregate(&self, topic: &str, plan: &ResearchPlan) -> AggregatedRecord {
        let mut collected = Vec::with_capacity(plan.research_steps.len());
        let mut image_url: Option<String> = None;
        let mut fact_summaries: Vec<String> = Vec::new();

        for step in &plan.research_steps {
            let query = step.query.as_str();
            let kind = self.classifier.classify(query);

            let result = match kind {
                StepKind::Image => match self.search.search_image(query).await {
                    Ok(url) => {
                        image_url = url.clone();
                        ResearchResult::Image { url }
                    }
                    Err(e) => {
                        tracing::warn!(step = step.ordinal, query, error = %e, "image lookup failed");
                        ResearchResult::Error {
                            message: e.to_string(),
                        }
                    }
                },
                StepKind::Text => {
                    match self.search.search_text(query, self.results_per_query).await {
                        Ok(hits) => {
                            let room = self.fact_summary_cap.saturating_sub(fact_summaries.len());
                            fact_summaries.extend(hits.iter().take(room).map(|h| h.summary_line()));
                            ResearchResult::Text { hits }
                        }
                        Err(e) => {
                            tracing::warn!(step = step.ordinal, query, error = %e, "text search failed");
                            ResearchResult::Error {
                                message: e.to_string(),
                            }
                        }
                    }
                }
            };

            tracing::debug!(step = step.ordinal, ?kind, failed = result.is_error(), "research step done");

            collected.push(CollectedEntry {
                query: step.query.clone(),
                kind,
                result,
            });
        }

        AggregatedRecord {
            topic: topic.to_string(),
            article_title: plan.article_title.clone(),
            collected,
            image_url,
            fact_summaries,
        }
    }
}
