//! 核心数据类型 - 贯穿检索与重排序流水线的数据结构

use serde::{Deserialize, Serialize};

/// 一篇文献记录
///
/// 检索阶段创建（score/reason为默认值），重排序阶段回填score与reason。
/// `id`为arXiv entry id，是跨查询去重的唯一键。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub authors: Vec<String>,
    pub published: String,
    /// 相关性评分，范围 [0, 10]
    #[serde(default)]
    pub score: f64,
    /// 评分理由
    #[serde(default)]
    pub reason: String,
}

/// 意图分析结果 - LLM将自由文本的研究想法解构为检索策略
///
/// `analysis`为必需字段，缺失视为解析失败；
/// `keywords`与`queries`允许缺失（容忍为空，检索阶段得到零结果）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub analysis: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub queries: Vec<String>,
}

/// 重排序解析的中间记录 - 合并回Paper后即被丢弃
#[derive(Debug, Clone, Deserialize)]
pub struct RankingEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

/// 结构化的研究分析报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    #[serde(rename = "keyTrends")]
    pub key_trends: Vec<String>,
    #[serde(rename = "suggestedDirections")]
    pub suggested_directions: Vec<String>,
}

/// 分析载荷 - 正常路径返回结构化报告，空检索路径返回一条提示性文本
///
/// 两种形态序列化后与对外API保持一致，调用方需同时处理。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Report(AnalysisReport),
    Advisory(String),
}

/// 流水线的最终输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub papers: Vec<Paper>,
    pub analysis: AnalysisPayload,
}

impl ResearchResult {
    /// 构造空检索路径的结果
    pub fn empty_with_advisory(message: impl Into<String>) -> Self {
        Self {
            papers: Vec::new(),
            analysis: AnalysisPayload::Advisory(message.into()),
        }
    }
}
