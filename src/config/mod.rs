use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::DocsmithError;
use crate::i18n::TargetLanguage;

/// 事实摘要条数的硬上限
pub const MAX_FACT_SUMMARIES: usize = 20;

/// 生成服务后端类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum GenerationBackend {
    /// 通用HTTP生成接口：Bearer鉴权，`{prompt, model, max_output_tokens}`
    #[serde(rename = "http")]
    #[default]
    Http,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for GenerationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationBackend::Http => write!(f, "http"),
            GenerationBackend::OpenAI => write!(f, "openai"),
            GenerationBackend::Moonshot => write!(f, "moonshot"),
            GenerationBackend::DeepSeek => write!(f, "deepseek"),
            GenerationBackend::Mistral => write!(f, "mistral"),
            GenerationBackend::OpenRouter => write!(f, "openrouter"),
            GenerationBackend::Anthropic => write!(f, "anthropic"),
            GenerationBackend::Gemini => write!(f, "gemini"),
            GenerationBackend::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for GenerationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(GenerationBackend::Http),
            "openai" => Ok(GenerationBackend::OpenAI),
            "moonshot" => Ok(GenerationBackend::Moonshot),
            "deepseek" => Ok(GenerationBackend::DeepSeek),
            "mistral" => Ok(GenerationBackend::Mistral),
            "openrouter" => Ok(GenerationBackend::OpenRouter),
            "anthropic" => Ok(GenerationBackend::Anthropic),
            "gemini" => Ok(GenerationBackend::Gemini),
            "ollama" => Ok(GenerationBackend::Ollama),
            _ => Err(format!("Unknown generation backend: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 替身模式：不访问任何网络，所有服务返回固定的合成数据
    pub stand_in: bool,

    /// 输出目录，缺省时使用当前工作目录
    pub output_dir: Option<PathBuf>,

    /// 文档语言
    pub language: TargetLanguage,

    /// 事实摘要条数上限，不超过 [`MAX_FACT_SUMMARIES`]
    pub fact_summary_cap: usize,

    /// 生成服务配置
    pub generation: GenerationConfig,

    /// 检索服务配置
    pub search: SearchConfig,

    /// 重试配置
    pub retry: RetryConfig,

    /// 文档排版配置
    pub document: DocumentConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 生成服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,

    /// HTTP后端的完整接口地址
    pub endpoint: String,

    pub api_key: String,

    /// rig provider 的API基地址
    pub api_base_url: String,

    pub model: String,

    pub plan_max_output_tokens: u32,

    pub article_max_output_tokens: u32,

    pub plan_timeout_secs: u64,

    pub article_timeout_secs: u64,

    pub temperature: f64,
}

/// 检索服务配置（Custom Search JSON API）
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,

    pub api_key: String,

    /// 搜索引擎ID（cx）
    pub engine_id: String,

    /// 每个查询保留的文本结果数
    pub results_per_query: usize,

    pub timeout_secs: u64,
}

/// 重试配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// 最大尝试次数（包含第一次）
    pub max_attempts: u32,

    /// 首次重试前的等待（毫秒）
    pub initial_delay_ms: u64,

    /// 退避倍率
    pub factor: f64,
}

/// 文档排版配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DocumentConfig {
    pub font_family: String,

    pub font_size_pt: u32,

    pub line_spacing: f64,

    pub image_width_inches: f64,

    pub image_timeout_secs: u64,

    /// 标题清洗后为空时使用的文件名
    pub fallback_file_stem: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 输出目录，未配置时为当前工作目录
    pub fn resolve_output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), DocsmithError> {
        if self.retry.max_attempts == 0 {
            return Err(DocsmithError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if !self.retry.factor.is_finite() || self.retry.factor <= 0.0 {
            return Err(DocsmithError::Config(
                "retry.factor must be a finite positive number".to_string(),
            ));
        }
        if self.fact_summary_cap > MAX_FACT_SUMMARIES {
            return Err(DocsmithError::Config(format!(
                "fact_summary_cap must not exceed {}",
                MAX_FACT_SUMMARIES
            )));
        }
        if self.search.results_per_query == 0 {
            return Err(DocsmithError::Config(
                "search.results_per_query must be at least 1".to_string(),
            ));
        }
        if self.stand_in {
            return Ok(());
        }

        let needs_generation_key = self.generation.backend != GenerationBackend::Ollama;
        if needs_generation_key && self.generation.api_key.trim().is_empty() {
            return Err(DocsmithError::Config(
                "generation.api_key is required outside stand-in mode".to_string(),
            ));
        }
        if self.search.api_key.trim().is_empty() || self.search.engine_id.trim().is_empty() {
            return Err(DocsmithError::Config(
                "search.api_key and search.engine_id are required outside stand-in mode"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stand_in: false,
            output_dir: None,
            language: TargetLanguage::default(),
            fact_summary_cap: MAX_FACT_SUMMARIES,
            generation: GenerationConfig::default(),
            search: SearchConfig::default(),
            retry: RetryConfig::default(),
            document: DocumentConfig::default(),
            verbose: false,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::default(),
            endpoint: String::from("https://api.gemini.example/v1/generate"),
            api_key: std::env::var("DOCSMITH_GENERATION_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gemini-2.5-flash"),
            plan_max_output_tokens: 800,
            article_max_output_tokens: 1500,
            plan_timeout_secs: 30,
            article_timeout_secs: 60,
            temperature: 0.3,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://www.googleapis.com/customsearch/v1"),
            api_key: std::env::var("DOCSMITH_SEARCH_API_KEY").unwrap_or_default(),
            engine_id: std::env::var("DOCSMITH_SEARCH_ENGINE_ID").unwrap_or_default(),
            results_per_query: 3,
            timeout_secs: 15,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 1000,
            factor: 2.0,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            font_family: String::from("Times New Roman"),
            font_size_pt: 14,
            line_spacing: 1.5,
            image_width_inches: 6.0,
            image_timeout_secs: 20,
            fallback_file_stem: String::from("article"),
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
