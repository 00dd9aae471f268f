//! 意图分析阶段 - 将研究想法转化为arXiv检索策略

use crate::llm::{CompletionProvider, LlmError};
use crate::llm::client::utils::extract_json_block;
use crate::pipeline::PipelineError;
use crate::types::IntentAnalysis;

/// 构建意图分析提示词
///
/// 采用问题优先的表述：要求模型识别基础研究问题、核心挑战与宽泛技术路线，
/// 并禁止引入用户未提及的具体架构名，以免查询收敛到过时方法。
fn build_intent_prompt(idea: &str) -> String {
    format!(
        r#"You are a Senior Computer Vision Researcher with a "Problem-First" mindset.
The user has a research idea/query. Your task is to translate this into a robust Arxiv search strategy.

User Input: "{idea}"

Task:
1. Analyze the technical intent. Identify the **Fundamental Research Problem** (e.g., "Sparse View Reconstruction" instead of "NeRF"), the **Core Challenge** (e.g., "Occlusion handling", "High frequency details"), and the **Broad Technical Route** (e.g., "Implicit representations", "Diffusion models").
2. Generate 3 DISTINCT Arxiv search queries to maximize recall.

CRITICAL CONSTRAINT:
- Do NOT include specific architecture names (e.g., "ResNet", "YOLO", "Transformer", "LoRA") or specific famous model names unless the user explicitly mentioned them. These limit the search scope to outdated methods.
- Instead, use the *academic description* of the method (e.g., use "masked image modeling" instead of "MAE", use "state space models" instead of "Mamba").

Output JSON format ONLY:
{{
    "analysis": "Brief analysis of the core problem and the type of solution strategy (abstracted from specific model names).",
    "keywords": ["Problem Definition", "Key Challenge", "Technical Paradigm"],
    "queries": [
        "Query 1 (Focus on Task + Input/Output definition)",
        "Query 2 (Focus on the Core Challenge/Constraint)",
        "Query 3 (Focus on the Intersection of Task and Broad Methodology)"
    ]
}}
"#
    )
}

/// 分析研究意图，产出检索策略
///
/// 单次调用，不做阶段级重试。解析失败映射为`IntentParse`，
/// 其余错误映射为`Service`，均向上传播终止本次请求。
pub async fn analyze_intent(
    llm: &dyn CompletionProvider,
    model: &str,
    idea: &str,
) -> Result<IntentAnalysis, PipelineError> {
    let prompt = build_intent_prompt(idea);
    let raw = llm.complete(&prompt, model).await.map_err(map_llm_error)?;

    let cleaned = extract_json_block(&raw);
    let intent: IntentAnalysis =
        serde_json::from_str(cleaned).map_err(|e| PipelineError::IntentParse(e.to_string()))?;

    Ok(intent)
}

fn map_llm_error(err: LlmError) -> PipelineError {
    if err.is_parse() {
        PipelineError::IntentParse(err.to_string())
    } else {
        PipelineError::Service(err.to_string())
    }
}
