use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// HTTP服务配置
    pub server: ServerConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 文献检索配置
    pub search: SearchConfig,

    /// 重排序后保留的论文数量
    pub top_papers: usize,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// HTTP服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,

    /// 监听端口
    pub port: u16,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址（OpenAI兼容接口）
    pub api_base_url: String,

    /// 推理模型
    pub model: String,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 文献检索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// 检索API基地址
    pub api_base_url: String,

    /// 单个查询的最大返回数量
    pub max_results_per_query: usize,

    /// 两次检索请求之间的最小间隔（毫秒）
    pub request_interval_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
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
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            top_papers: 20,
            verbose: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("PAPERSCOUT_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            temperature: 0.1,
            retry_attempts: 3,
            retry_delay_ms: 3000,
            timeout_seconds: 300,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::from("https://export.arxiv.org/api/query"),
            max_results_per_query: 100,
            request_interval_ms: 3000,
            timeout_seconds: 30,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
