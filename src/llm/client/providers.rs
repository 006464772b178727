//! LLM Provider支持模块，基于rig对接各家模型服务

use async_trait::async_trait;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::Prompt,
    providers::gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig as GeminiGenerationConfig},
};

use super::{GenerationClient, GenerationRequest};
use crate::config::{GenerationBackend, GenerationConfig};
use crate::error::{DocsmithError, Result};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Moonshot(rig::providers::moonshot::Client),
    DeepSeek(rig::providers::deepseek::Client),
    Mistral(rig::providers::mistral::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Gemini(rig::providers::gemini::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        match config.backend {
            GenerationBackend::OpenAI => {
                let client = rig::providers::openai::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::OpenAI(client))
            }
            GenerationBackend::Moonshot => {
                let client = rig::providers::moonshot::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::Moonshot(client))
            }
            GenerationBackend::DeepSeek => {
                let client = rig::providers::deepseek::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::DeepSeek(client))
            }
            GenerationBackend::Mistral => {
                let client = rig::providers::mistral::Client::builder(&config.api_key).build();
                Ok(ProviderClient::Mistral(client))
            }
            GenerationBackend::OpenRouter => {
                let client = rig::providers::openrouter::Client::builder(&config.api_key).build();
                Ok(ProviderClient::OpenRouter(client))
            }
            GenerationBackend::Anthropic => {
                let client = rig::providers::anthropic::ClientBuilder::new(&config.api_key)
                    .build()
                    .map_err(|e| DocsmithError::Provider(e.to_string()))?;
                Ok(ProviderClient::Anthropic(client))
            }
            GenerationBackend::Gemini => {
                let client = rig::providers::gemini::Client::builder(&config.api_key)
                    .build()
                    .map_err(|e| DocsmithError::Provider(e.to_string()))?;
                Ok(ProviderClient::Gemini(client))
            }
            GenerationBackend::Ollama => {
                let client = rig::providers::ollama::Client::builder().build();
                Ok(ProviderClient::Ollama(client))
            }
            GenerationBackend::Http => Err(DocsmithError::Config(
                "the http backend is not a rig provider".to_string(),
            )),
        }
    }

    /// 创建Agent，每次请求按需构建以便使用请求自己的token上限
    pub fn create_agent(
        &self,
        model: &str,
        system_prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> ProviderAgent {
        match self {
            ProviderClient::OpenAI(client) => {
                let agent = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(max_tokens.into())
                    .temperature(temperature)
                    .build();
                ProviderAgent::OpenAI(agent)
            }
            ProviderClient::Moonshot(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(max_tokens.into())
                    .temperature(temperature)
                    .build();
                ProviderAgent::Moonshot(agent)
            }
            ProviderClient::DeepSeek(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(max_tokens.into())
                    .temperature(temperature)
                    .build();
                ProviderAgent::DeepSeek(agent)
            }
            ProviderClient::Mistral(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(temperature)
                    .build();
                ProviderAgent::Mistral(agent)
            }
            ProviderClient::OpenRouter(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .temperature(temperature)
                    .build();
                ProviderAgent::OpenRouter(agent)
            }
            ProviderClient::Anthropic(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(max_tokens.into())
                    .temperature(temperature)
                    .build();
                ProviderAgent::Anthropic(agent)
            }
            ProviderClient::Gemini(client) => {
                let builder = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(max_tokens.into())
                    .temperature(temperature);
                let params =
                    AdditionalParameters::default().with_config(GeminiGenerationConfig::default());
                let builder = match serde_json::to_value(params) {
                    Ok(value) => builder.additional_params(value),
                    Err(_) => builder,
                };
                ProviderAgent::Gemini(builder.build())
            }
            ProviderClient::Ollama(client) => {
                let agent = client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(max_tokens.into())
                    .temperature(temperature)
                    .build();
                ProviderAgent::Ollama(agent)
            }
        }
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Mistral(Agent<rig::providers::mistral::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Gemini(Agent<rig::providers::gemini::completion::CompletionModel>),
    Moonshot(Agent<rig::providers::moonshot::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        let result = match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await,
            ProviderAgent::Moonshot(agent) => agent.prompt(prompt).await,
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).await,
            ProviderAgent::Mistral(agent) => agent.prompt(prompt).await,
            ProviderAgent::OpenRouter(agent) => agent.prompt(prompt).await,
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await,
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).await,
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).await,
        };
        result.map_err(|e| DocsmithError::Provider(e.to_string()))
    }
}

/// 通过rig provider访问生成服务
#[derive(Clone)]
pub struct ProviderGenerationClient {
    client: ProviderClient,
    model: String,
    temperature: f64,
}

impl ProviderGenerationClient {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            client: ProviderClient::new(config)?,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl GenerationClient for ProviderGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let agent = self.client.create_agent(
            &self.model,
            &request.system,
            request.max_output_tokens,
            self.temperature,
        );

        tracing::debug!(model = %self.model, "calling rig provider");

        match tokio::time::timeout(request.timeout, agent.prompt(&request.user)).await {
            Ok(result) => result,
            Err(_) => Err(DocsmithError::Provider(format!(
                "no response within {}s",
                request.timeout.as_secs()
            ))),
        }
    }
}
