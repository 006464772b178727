//! 流水线各阶段之间传递的数据结构

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 研究计划：文章标题 + 有序的检索查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPlan {
    pub article_title: String,
    pub research_steps: Vec<ResearchStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchStep {
    #[serde(rename = "step")]
    pub ordinal: u32,
    pub query: String,
}

/// 单条文本检索结果，字段缺失时为空串
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchHit {
    /// "title — snippet (link)"
    pub fn summary_line(&self) -> String {
        format!("{} — {} ({})", self.title, self.snippet, self.link)
    }
}

/// 查询的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Text,
    Image,
}

/// 单个研究步骤的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ResearchResult {
    Text { hits: Vec<SearchHit> },
    Image { url: Option<String> },
    Error { message: String },
}

impl ResearchResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ResearchResult::Error { .. })
    }
}

/// 一次查询及其结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedEntry {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub result: ResearchResult,
}

/// 汇总后的研究资料，交给文章生成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRecord {
    pub topic: String,
    pub article_title: String,
    pub collected: Vec<CollectedEntry>,
    pub image_url: Option<String>,
    pub fact_summaries: Vec<String>,
}

/// 文章
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: String,
}

/// 图片占位节的标题写法，比较时忽略大小写和首尾空白
pub const IMAGE_PLACEHOLDER_HEADINGS: [&str; 3] = ["imageplaceholder", "image placeholder", "image"];

impl Section {
    /// 是否为图片占位节（内容标记，不作为标题渲染）
    pub fn is_image_placeholder(&self) -> bool {
        let heading = self.heading.trim().to_lowercase();
        IMAGE_PLACEHOLDER_HEADINGS.contains(&heading.as_str())
    }

    /// 按空行切分正文段落，去掉空段
    pub fn paragraphs(&self) -> Vec<&str> {
        self.body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// 一次完整运行的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub file_path: PathBuf,
    pub article: Article,
    pub image_url: Option<String>,
    pub plan: ResearchPlan,
    pub collected: Vec<CollectedEntry>,
    /// 各阶段耗时（毫秒）
    pub timings: BTreeMap<String, u64>,
}
