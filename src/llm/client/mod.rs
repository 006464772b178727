//! LLM客户端 - 提供统一的生成服务接口

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{GenerationBackend, GenerationConfig};
use crate::error::Result;

mod http;
mod providers;

pub use http::HttpGenerationClient;
pub use providers::ProviderGenerationClient;

/// 一次生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// 系统指令，约束输出格式
    pub system: String,
    /// 本次调用的输入数据
    pub user: String,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl GenerationRequest {
    /// 合并为单个prompt，供只接收一段文本的接口使用
    pub fn combined_prompt(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// 生成服务能力：输入请求，返回未经解析的原始文本
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// 根据配置创建生成服务客户端
pub fn build_generation_client(config: &GenerationConfig) -> Result<Arc<dyn GenerationClient>> {
    match config.backend {
        GenerationBackend::Http => Ok(Arc::new(HttpGenerationClient::new(config))),
        _ => Ok(Arc::new(ProviderGenerationClient::new(config)?)),
    }
}
