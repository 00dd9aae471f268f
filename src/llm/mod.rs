//! LLM服务接入层

use async_trait::async_trait;
use thiserror::Error;

pub mod client;

pub use client::LLMClient;

/// LLM服务调用错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 无法到达服务或连接中断
    #[error("LLM request failed: {0}")]
    Transport(String),

    /// 请求超出配置的时限
    #[error("LLM request timed out")]
    Timeout,

    /// 服务返回非2xx状态
    #[error("LLM service returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// 流式响应读取中断
    #[error("failed to read LLM response stream: {0}")]
    Stream(String),

    /// 清理后的响应无法解析为要求的结构
    #[error("failed to parse LLM response: {0}")]
    Parse(String),
}

impl LlmError {
    /// 是否为响应内容解析失败（区别于传输层故障）
    pub fn is_parse(&self) -> bool {
        matches!(self, LlmError::Parse(_))
    }
}

/// 补全服务的统一接口
///
/// 将流式分片交付的模型响应聚合为一段完整文本后返回。
/// 流水线各阶段只依赖该接口，便于在测试中替换为脚本化实现。
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// 发送prompt并等待完整响应文本
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, LlmError>;
}
