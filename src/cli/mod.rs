use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// PaperScout-RS - 由Rust与AI驱动的科研文献调研引擎
#[derive(Parser, Debug)]
#[command(name = "paperscout-rs")]
#[command(
    about = "AI-based research assistant service. It decomposes a research idea into search intents, retrieves candidate papers from arXiv, and reranks them with an LLM."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 监听地址
    #[arg(long)]
    pub host: Option<String>,

    /// 监听端口
    #[arg(short, long)]
    pub port: Option<u16>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 推理模型
    #[arg(short, long)]
    pub model: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 单个查询的最大检索数量
    #[arg(long)]
    pub max_results: Option<usize>,

    /// 重排序后保留的论文数量
    #[arg(long)]
    pub top_papers: Option<usize>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定了配置文件路径，读取失败属于启动错误
            Config::from_file(config_path)
                .unwrap_or_else(|e| panic!("⚠️ 无法读取配置文件 {:?}: {}", config_path, e))
        } else {
            // 未显式指定时尝试默认位置，不存在则使用默认值
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("paperscout.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|e| {
                    eprintln!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}，使用默认配置: {}",
                        default_config_path, e
                    );
                    Config::default()
                })
            } else {
                Config::default()
            }
        };

        // CLI参数覆盖配置文件中的设置
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results_per_query = max_results;
        }
        if let Some(top_papers) = self.top_papers {
            config.top_papers = top_papers;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }
}
