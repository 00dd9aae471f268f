//! HTTP服务层 - 对外暴露调研接口

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::arxiv::ArxivClient;
use crate::config::Config;
use crate::llm::LLMClient;
use crate::pipeline::{PipelineError, ResearchPipeline};
use crate::types::ResearchResult;

/// 调研请求体
#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub idea: String,
}

/// 构建路由
///
/// 跨域策略放开所有来源、方法与请求头，便于前端直接调用。
pub fn build_router(pipeline: Arc<ResearchPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/research", post(research_handler))
        .layer(cors)
        .with_state(pipeline)
}

/// POST /api/research
async fn research_handler(
    State(pipeline): State<Arc<ResearchPipeline>>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResult>, (StatusCode, Json<serde_json::Value>)> {
    match pipeline.execute(&request.idea).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            eprintln!("❌ 请求处理失败: {}", e);
            let status = match e {
                PipelineError::EmptyIdea => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({"error": e.to_string()}))))
        }
    }
}

/// 启动HTTP服务
///
/// 构建模型客户端与检索客户端，探测模型连通性后绑定端口对外服务。
pub async fn launch(config: Config) -> Result<()> {
    let llm = LLMClient::new(&config.llm).context("Failed to build LLM client")?;
    llm.check_connection()
        .await
        .context("LLM connection check failed")?;

    let source = ArxivClient::new(&config.search).context("Failed to build arXiv client")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let pipeline = Arc::new(ResearchPipeline::new(
        Arc::new(llm),
        Arc::new(source),
        config,
    ));
    let app = build_router(pipeline);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    println!("🚀 paperscout-rs 服务已启动: http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
