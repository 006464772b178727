//! 错误类型定义
//!
//! 流水线中所有可能出现的失败都归入 [`DocsmithError`]。
//! 空的检索结果不是错误，因此这里没有对应的变体。

use std::path::PathBuf;
use thiserror::Error;

/// docsmith 统一错误类型
#[derive(Error, Debug)]
pub enum DocsmithError {
    /// 网络传输失败（连接、超时、读取响应体等）
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 外部服务返回了非成功的HTTP状态码
    #[error("{service} returned HTTP {status}: {body}")]
    HttpStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// 生成服务返回的研究计划无法解析，携带原始文本
    #[error("failed to parse research plan from generation service: {raw}")]
    PlanParse { raw: String },

    /// 生成服务返回的文章无法解析，携带原始文本
    #[error("failed to parse article from generation service: {raw}")]
    ArticleParse { raw: String },

    /// 图片字节无法解码
    #[error("image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// 目录或文件写入失败
    #[error("filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// docx打包失败
    #[error("document packaging error: {0}")]
    Document(String),

    /// rig provider 调用失败
    #[error("generation provider error: {0}")]
    Provider(String),

    /// 配置不合法
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DocsmithError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocsmithError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocsmithError>;
