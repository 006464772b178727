use crate::config::{Config, GenerationBackend};
use crate::i18n::TargetLanguage;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// docsmith - 根据主题自动检索资料、撰写文章并生成 Word 文档
#[derive(Parser, Debug)]
#[command(name = "docsmith")]
#[command(
    about = "Turns a topic into a finished .docx article: plans research with an LLM, gathers facts and an image through web search, writes the article and renders it."
)]
#[command(version)]
pub struct Args {
    /// 文章主题
    pub topic: String,

    /// 输出目录，默认为当前目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 替身模式：不访问任何外部服务，使用固定数据
    #[arg(long)]
    pub stand_in: bool,

    /// 文档语言 (en, ru)
    #[arg(short, long)]
    pub language: Option<String>,

    /// 生成服务后端 (http, openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub backend: Option<String>,

    /// 生成模型
    #[arg(long)]
    pub model: Option<String>,

    /// http 后端的生成服务地址
    #[arg(long)]
    pub endpoint: Option<String>,

    /// rig provider 的 API 基地址
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// 生成服务 API KEY
    #[arg(long)]
    pub generation_api_key: Option<String>,

    /// 检索服务 API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 检索引擎 ID
    #[arg(long)]
    pub search_engine_id: Option<String>,

    /// 每次远程调用的最大尝试次数
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// 以 JSON 输出完整运行结果
    #[arg(long)]
    pub json: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("docsmith.toml");
                if default_config_path.exists() {
                    Config::from_file(&default_config_path).with_context(|| {
                        format!("无法读取默认配置文件 {:?}", default_config_path)
                    })?
                } else {
                    Config::default()
                }
            }
        };

        if self.stand_in {
            config.stand_in = true;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = Some(output_dir);
        }

        if let Some(language) = self.language {
            config.language = language
                .parse::<TargetLanguage>()
                .map_err(anyhow::Error::msg)
                .with_context(|| "未知的文档语言")?;
        }

        // 覆盖生成服务配置
        if let Some(backend) = self.backend {
            config.generation.backend = backend
                .parse::<GenerationBackend>()
                .map_err(anyhow::Error::msg)
                .with_context(|| "未知的生成服务后端")?;
        }
        if let Some(model) = self.model {
            config.generation.model = model;
        }
        if let Some(endpoint) = self.endpoint {
            config.generation.endpoint = endpoint;
        }
        if let Some(api_base_url) = self.api_base_url {
            config.generation.api_base_url = api_base_url;
        }
        if let Some(api_key) = self.generation_api_key {
            config.generation.api_key = api_key;
        }

        // 覆盖检索服务配置
        if let Some(api_key) = self.search_api_key {
            config.search.api_key = api_key;
        }
        if let Some(engine_id) = self.search_engine_id {
            config.search.engine_id = engine_id;
        }

        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
