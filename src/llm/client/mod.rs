//! LLM客户端 - 基于OpenAI兼容接口的流式补全实现

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::LLMConfig;
use crate::llm::{CompletionProvider, LlmError};

pub mod utils;

/// LLM客户端
///
/// 请求OpenAI兼容的chat completions接口，要求JSON格式输出并以SSE流式接收，
/// 将各分片按到达顺序拼接为完整响应后才返回调用方。
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    http: reqwest::Client,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    /// 检查模型连接和功能是否正常
    ///
    /// 走完整的补全与解析链路，确认服务可达且JSON输出模式生效。
    pub async fn check_connection(&self) -> Result<(), LlmError> {
        println!("🔄 正在检查模型连接...");
        match self
            .extract::<Value>("Reply with a JSON object {\"ok\": true}", &self.config.model)
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T, LlmError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let max_retries = self.config.retry_attempts;
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                // 解析类错误重试无益，直接交由调用方决定兜底策略
                Err(err) if err.is_parse() => return Err(err),
                Err(err) => {
                    retries += 1;
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {} 次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 单次流式补全请求，将SSE分片聚合为完整文本
    async fn complete_once(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
            "temperature": self.config.temperature,
            "stream": true,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // 逐块读取SSE响应体，按行切分后提取增量内容。
        // 分片可能在任意字节处截断，因此以字节缓冲累积，仅对完整行做UTF-8解码。
        let mut stream = response.bytes_stream();
        let mut line_buf: Vec<u8> = Vec::new();
        let mut full_response = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Stream(e.to_string())
                }
            })?;
            line_buf.extend_from_slice(&chunk);

            while let Some(pos) = line_buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = line_buf.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                if let Some(delta) = parse_sse_delta(line.trim()) {
                    full_response.push_str(&delta);
                }
            }
        }

        // 流结束后缓冲中可能残留最后一行（无换行结尾）
        if !line_buf.is_empty() {
            let line = String::from_utf8_lossy(&line_buf);
            if let Some(delta) = parse_sse_delta(line.trim()) {
                full_response.push_str(&delta);
            }
        }

        Ok(full_response)
    }

    /// 数据提取方法 - 补全后清理代码块围栏并反序列化为目标结构
    pub async fn extract<T>(&self, prompt: &str, model: &str) -> Result<T, LlmError>
    where
        T: DeserializeOwned,
    {
        let raw = CompletionProvider::complete(self, prompt, model).await?;
        let cleaned = utils::extract_json_block(&raw);
        serde_json::from_str(cleaned).map_err(|e| LlmError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CompletionProvider for LLMClient {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, LlmError> {
        self.retry_with_backoff(|| self.complete_once(prompt, model))
            .await
    }
}

/// 解析单行SSE数据，返回其中的增量文本内容
fn parse_sse_delta(line: &str) -> Option<String> {
    let data = line.strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }
    let value: Value = serde_json::from_str(data).ok()?;
    let content = value
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}
