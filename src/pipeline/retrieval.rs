//! 多路召回阶段 - 逐条执行检索查询并按id去重合并

use std::collections::HashSet;

use crate::arxiv::PaperSource;
use crate::types::Paper;

/// 执行多查询检索并合并结果
///
/// 查询顺序执行。同一id的论文只保留首次出现的记录，
/// 结果保持插入顺序，重排序失败时的兜底顺序由此保证确定性。
/// 单条查询失败只记录日志并视为零结果，不影响其余查询。
pub async fn retrieve(
    source: &dyn PaperSource,
    queries: &[String],
    max_results: usize,
) -> Vec<Paper> {
    let mut papers: Vec<Paper> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for query in queries {
        let clean_query = sanitize_query(query);
        println!("🔍 检索 [{}]: {}", source.name(), clean_query);

        match source.search(&clean_query, max_results).await {
            Ok(results) => {
                for paper in results {
                    if seen.insert(paper.id.clone()) {
                        papers.push(paper);
                    }
                }
            }
            Err(e) => {
                eprintln!("❌ 查询检索失败 '{}': {}", clean_query, e);
            }
        }
    }

    println!("✅ 去重后共获得 {} 篇论文", papers.len());
    papers
}

/// 清理查询文本，去掉会干扰检索语法的引号
fn sanitize_query(query: &str) -> String {
    query.replace(['"', '\''], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_query_strips_quotes() {
        assert_eq!(
            sanitize_query(r#""sparse view" reconstruction"#),
            "sparse view reconstruction"
        );
        assert_eq!(sanitize_query("it's a query"), "its a query");
        assert_eq!(sanitize_query("plain"), "plain");
    }
}
