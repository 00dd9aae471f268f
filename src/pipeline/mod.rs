//! 调研流水线 - 意图分析、多路召回与智能重排序的编排

use std::sync::Arc;

use thiserror::Error;

use crate::arxiv::PaperSource;
use crate::config::Config;
use crate::llm::CompletionProvider;
use crate::types::{AnalysisPayload, AnalysisReport, IntentAnalysis, Paper, ResearchResult};

pub mod intent;
pub mod rerank;
pub mod retrieval;

/// 空检索路径的提示文本
const EMPTY_RESULT_ADVISORY: &str = "No papers found. Try a broader query.";

/// 流水线执行错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 研究想法为空或仅含空白
    #[error("research idea must not be empty")]
    EmptyIdea,

    /// 意图分析输出无法解析为检索策略
    #[error("failed to parse intent analysis: {0}")]
    IntentParse(String),

    /// 模型服务调用失败
    #[error("llm service error: {0}")]
    Service(String),
}

/// 调研流水线
///
/// 持有模型与检索源的trait对象，按固定阶段顺序执行：
/// 意图分析 → 多路召回 → 重排序 → 汇总报告。
/// 阶段内的容错策略各不相同：意图分析失败终止请求，
/// 召回按查询吸收失败，重排序失败回退原始顺序。
pub struct ResearchPipeline {
    llm: Arc<dyn CompletionProvider>,
    source: Arc<dyn PaperSource>,
    config: Config,
}

impl ResearchPipeline {
    /// 创建新的调研流水线
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        source: Arc<dyn PaperSource>,
        config: Config,
    ) -> Self {
        Self {
            llm,
            source,
            config,
        }
    }

    /// 执行一次完整的调研请求
    pub async fn execute(&self, idea: &str) -> Result<ResearchResult, PipelineError> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(PipelineError::EmptyIdea);
        }

        println!("🚀 收到调研请求: {}", idea);

        // 阶段一：意图分析
        println!("🤖 阶段一：分析研究意图...");
        let intent = intent::analyze_intent(self.llm.as_ref(), &self.config.llm.model, idea).await?;
        println!("✓ 意图分析: {}", intent.analysis);
        if self.config.verbose {
            println!("✓ 生成查询: {:?}", intent.queries);
        }

        // 阶段二：多路召回
        println!("🔄 阶段二：执行多查询检索...");
        let papers = retrieval::retrieve(
            self.source.as_ref(),
            &intent.queries,
            self.config.search.max_results_per_query,
        )
        .await;

        if papers.is_empty() {
            println!("⚠️ 未检索到任何论文");
            return Ok(ResearchResult::empty_with_advisory(EMPTY_RESULT_ADVISORY));
        }

        // 阶段三：智能重排序
        println!("🤖 阶段三：重排序 {} 篇候选论文...", papers.len());
        let final_papers = rerank::rerank(
            self.llm.as_ref(),
            &self.config.llm.model,
            idea,
            &intent.analysis,
            papers,
            self.config.top_papers,
        )
        .await;

        // 阶段四：汇总报告
        let report = build_report(&intent, &final_papers);
        println!("✅ 调研完成，返回 {} 篇论文", final_papers.len());

        Ok(ResearchResult {
            papers: final_papers,
            analysis: AnalysisPayload::Report(report),
        })
    }
}

/// 汇总分析报告：策略分析加上对榜首论文的一句话推荐
fn build_report(intent: &IntentAnalysis, papers: &[Paper]) -> AnalysisReport {
    let mut summary = format!("**Research Strategy Analysis:**\n{}", intent.analysis);

    if let Some(top_paper) = papers.first() {
        let reason = if top_paper.reason.is_empty() {
            "It matches your query well."
        } else {
            &top_paper.reason
        };
        summary.push_str(&format!(
            "\n\n**Top Recommendation:**\nThe paper *{}* is highly recommended because: {}",
            top_paper.title, reason
        ));
    }

    let key_trends = if intent.keywords.is_empty() {
        vec![String::from("AI Research"), String::from("Computer Vision")]
    } else {
        intent.keywords.clone()
    };

    AnalysisReport {
        summary,
        key_trends,
        suggested_directions: intent.queries.clone(),
    }
}
