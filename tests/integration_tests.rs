use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use paperscout_rs::arxiv::{PaperSource, SearchError};
use paperscout_rs::config::Config;
use paperscout_rs::llm::{CompletionProvider, LlmError};
use paperscout_rs::pipeline::ResearchPipeline;
use paperscout_rs::server::build_router;
use paperscout_rs::types::Paper;

/// 按脚本顺序返回预设响应的模型桩
struct ScriptedCompletion {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedCompletion {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, _prompt: &str, _model: &str) -> Result<String, LlmError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Transport(String::from("script exhausted")))
    }
}

/// 每次查询返回同一组论文的检索源桩
struct FixedSource {
    papers: Vec<Paper>,
}

#[async_trait]
impl PaperSource for FixedSource {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<Paper>, SearchError> {
        Ok(self.papers.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn sample_paper(id: &str, title: &str) -> Paper {
    Paper {
        id: format!("http://arxiv.org/abs/{}", id),
        title: title.to_string(),
        summary: format!("Abstract of {}.", title),
        url: format!("http://arxiv.org/pdf/{}", id),
        authors: vec![String::from("A. Author")],
        published: String::from("2024-06-01T00:00:00Z"),
        score: 0.0,
        reason: String::new(),
    }
}

const INTENT_RESPONSE: &str = r#"{"analysis": "Sparse view reconstruction with implicit representations.",
    "keywords": ["Sparse View Reconstruction", "Occlusion Handling", "Implicit Representations"],
    "queries": ["sparse view reconstruction", "occlusion handling", "implicit representation few shot"]}"#;

fn build_app(llm: ScriptedCompletion, papers: Vec<Paper>) -> axum::Router {
    let pipeline = ResearchPipeline::new(
        Arc::new(llm),
        Arc::new(FixedSource { papers }),
        Config::default(),
    );
    build_router(Arc::new(pipeline))
}

async fn post_research(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/research")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_research_happy_path() {
    let llm = ScriptedCompletion::new(vec![
        INTENT_RESPONSE,
        r#"[{"id": "http://arxiv.org/abs/1", "title": "P1", "score": 9.0, "reason": "strong match"},
            {"id": "http://arxiv.org/abs/2", "title": "P2", "score": 6.0, "reason": "related"}]"#,
    ]);
    let papers = vec![sample_paper("1", "P1"), sample_paper("2", "P2")];
    let app = build_app(llm, papers);

    let (status, body) = post_research(app, r#"{"idea": "sparse view reconstruction"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let returned = body["papers"].as_array().unwrap();
    assert_eq!(returned.len(), 2);
    assert_eq!(returned[0]["id"], "http://arxiv.org/abs/1");
    assert_eq!(returned[0]["score"], 9.0);
    assert_eq!(returned[0]["reason"], "strong match");

    // 结构化分析报告的对外字段名
    let analysis = &body["analysis"];
    assert!(
        analysis["summary"]
            .as_str()
            .unwrap()
            .contains("**Top Recommendation:**")
    );
    assert!(analysis["keyTrends"].is_array());
    assert!(analysis["suggestedDirections"].is_array());
}

#[tokio::test]
async fn test_research_empty_idea_rejected() {
    let llm = ScriptedCompletion::new(vec![]);
    let app = build_app(llm, vec![]);

    let (status, body) = post_research(app, r#"{"idea": "   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_research_no_papers_yields_advisory() {
    let llm = ScriptedCompletion::new(vec![INTENT_RESPONSE]);
    let app = build_app(llm, vec![]);

    let (status, body) = post_research(app, r#"{"idea": "sparse view reconstruction"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["papers"].as_array().unwrap().is_empty());
    assert_eq!(body["analysis"], "No papers found. Try a broader query.");
}

#[tokio::test]
async fn test_research_llm_failure_is_server_error() {
    // 脚本为空，意图分析阶段即失败
    let llm = ScriptedCompletion::new(vec![]);
    let app = build_app(llm, vec![sample_paper("1", "P1")]);

    let (status, body) = post_research(app, r#"{"idea": "sparse view reconstruction"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
