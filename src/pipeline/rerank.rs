//! 智能重排序阶段 - 由LLM按相关性与时效性为候选论文打分

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::json;

use crate::llm::CompletionProvider;
use crate::llm::client::utils::extract_json_block;
use crate::types::{Paper, RankingEntry};

/// 摘要送入模型前的截断长度（字符）
const ABSTRACT_TRUNCATE_CHARS: usize = 500;

/// 对候选论文执行LLM重排序
///
/// 补全或解析失败时回退为召回顺序的前`top_n`篇，分数保持原样，
/// 本函数从不返回错误。排序为稳定排序，同分论文保持插入顺序。
pub async fn rerank(
    llm: &dyn CompletionProvider,
    model: &str,
    idea: &str,
    analysis: &str,
    mut papers: Vec<Paper>,
    top_n: usize,
) -> Vec<Paper> {
    let prompt = build_rerank_prompt(idea, analysis, &papers);

    let ranking = match llm.complete(&prompt, model).await {
        Ok(raw) => {
            let cleaned = extract_json_block(&raw);
            serde_json::from_str::<Vec<RankingEntry>>(cleaned)
        }
        Err(e) => {
            eprintln!("❌ 重排序失败: {}，返回原始顺序", e);
            papers.truncate(top_n);
            return papers;
        }
    };

    match ranking {
        Ok(entries) => {
            apply_ranking(&mut papers, entries);
            papers.truncate(top_n);
            papers
        }
        Err(e) => {
            eprintln!("❌ 重排序结果解析失败: {}，返回原始顺序", e);
            papers.truncate(top_n);
            papers
        }
    }
}

/// 构建重排序提示词，附带压缩后的论文清单以节省tokens
fn build_rerank_prompt(idea: &str, analysis: &str, papers: &[Paper]) -> String {
    let papers_for_ranking: Vec<_> = papers
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "title": p.title,
                "published": p.published,
                "abstract": truncate_chars(&p.summary, ABSTRACT_TRUNCATE_CHARS),
            })
        })
        .collect();
    let papers_json = serde_json::Value::Array(papers_for_ranking).to_string();

    format!(
        r#"User Research Intent: "{idea}"
Technical Analysis: "{analysis}"

Task:
Score the following papers (0-10) based on how well they match the user's specific technical constraints AND how recent they are.

Scoring Criteria:
- Relevance (Primary): Does it solve the core problem?
- Recency (Secondary): Boost score for papers published in 2024-2025. Penalize slightly for papers older than 2023 unless seminal.

- High Score (8-10): Highly relevant AND recent (or a classic seminal paper).
- Medium Score (5-7): Relevant but older, or slightly less relevant but very recent.
- Low Score (0-4): Irrelevant.

Papers to Rank:
{papers_json}

Output JSON format ONLY:
[
    {{"id": "paper_entry_id", "title": "paper_title", "score": 9.5, "reason": "Brief reason..."}},
    ...
]
"#
    )
}

/// 将打分结果合并回论文列表并按分数降序排序
///
/// 未出现在打分结果中的论文不会被丢弃，置0分并标记"Not ranked"。
fn apply_ranking(papers: &mut [Paper], entries: Vec<RankingEntry>) {
    let ranking_map: HashMap<String, RankingEntry> =
        entries.into_iter().map(|e| (e.id.clone(), e)).collect();

    for paper in papers.iter_mut() {
        match ranking_map.get(&paper.id) {
            Some(entry) => {
                paper.score = entry.score;
                paper.reason = entry.reason.clone();
            }
            None => {
                paper.score = 0.0;
                paper.reason = String::from("Not ranked");
            }
        }
    }

    papers.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// 按字符数截断，保证不在UTF-8边界中间切断
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
