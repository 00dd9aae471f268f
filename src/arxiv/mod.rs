//! arXiv检索接入层 - 文献检索服务的客户端与统一接口

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::SearchConfig;
use crate::types::Paper;

/// 检索服务调用错误，作用域为单次查询
#[derive(Debug, Error)]
pub enum SearchError {
    /// 无法到达服务或连接中断
    #[error("search request failed: {0}")]
    Transport(String),

    /// 服务返回非2xx状态
    #[error("search service returned status {0}")]
    Status(u16),
}

/// 文献检索源的统一接口
///
/// 按相关性返回最多`max_results`条记录。实现负责自身的编码与节流；
/// 去重由检索引擎统一处理，实现无需保证结果不重复。
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// 执行一次检索
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>, SearchError>;

    /// 数据源名称，用于日志
    fn name(&self) -> &str;
}

/// arXiv API客户端
///
/// 请求export接口并解析Atom XML响应。对arXiv保持礼貌性的请求间隔。
pub struct ArxivClient {
    http: reqwest::Client,
    api_base_url: String,
    request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl ArxivClient {
    /// 创建新的arXiv客户端
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("paperscout-rs/0.3 (https://github.com/sopaco/paperscout-rs)")
            .build()
            .map_err(|e| SearchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base_url: config.api_base_url.clone(),
            request_interval: Duration::from_millis(config.request_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// 控制请求节奏，保证两次请求之间的最小间隔
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(instant) = *last {
            let elapsed = instant.elapsed();
            if elapsed < self.request_interval {
                tokio::time::sleep(self.request_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn build_search_url(&self, query: &str, max_results: usize) -> String {
        let search_query = format!("all:{}", query);
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=relevance&sortOrder=descending",
            self.api_base_url,
            urlencoding::encode(&search_query),
            max_results,
        )
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>, SearchError> {
        self.pace().await;
        let url = self.build_search_url(query, max_results);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(parse_atom_feed(&body))
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

// ── Atom XML 解析 ─────────────────────────────────────────────

/// 解析arXiv的Atom响应，无法解析的entry直接跳过
pub fn parse_atom_feed(xml: &str) -> Vec<Paper> {
    extract_blocks(xml, "<entry>", "</entry>")
        .iter()
        .filter_map(|entry| parse_entry(entry))
        .collect()
}

/// 将单个<entry>块解析为Paper
fn parse_entry(entry: &str) -> Option<Paper> {
    let id = extract_tag_text(entry, "id")?;
    let title = normalize_whitespace(&extract_tag_text(entry, "title")?);
    let summary = normalize_whitespace(&extract_tag_text(entry, "summary").unwrap_or_default());
    let published = extract_tag_text(entry, "published").unwrap_or_default();

    let authors: Vec<String> = extract_blocks(entry, "<author>", "</author>")
        .iter()
        .filter_map(|block| extract_tag_text(block, "name"))
        .collect();

    // PDF链接取title="pdf"或type为application/pdf的<link>，缺失时从id推导
    let mut pdf_url = String::new();
    for link in extract_link_tags(entry) {
        let title_attr = extract_attribute(&link, "title").unwrap_or_default();
        let link_type = extract_attribute(&link, "type").unwrap_or_default();
        if title_attr == "pdf" || link_type == "application/pdf" {
            pdf_url = extract_attribute(&link, "href").unwrap_or_default();
            break;
        }
    }
    if pdf_url.is_empty() {
        pdf_url = id.replace("/abs/", "/pdf/");
    }

    Some(Paper {
        id,
        title,
        summary,
        url: pdf_url,
        authors,
        published,
        score: 0.0,
        reason: String::new(),
    })
}

/// 提取所有以start_tag开始、end_tag结束的块（含标签本身）
fn extract_blocks(xml: &str, start_tag: &str, end_tag: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = xml[search_from..].find(start_tag) {
        let start = search_from + pos;
        let Some(end_pos) = xml[start..].find(end_tag) else {
            break;
        };
        let end = start + end_pos + end_tag.len();
        blocks.push(xml[start..end].to_string());
        search_from = end;
    }

    blocks
}

/// 提取第一个<tag>...</tag>的文本内容
fn extract_tag_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start_pos = xml.find(&open)?;
    // 开始标签可能携带属性，定位到其闭合的'>'
    let content_start = xml[start_pos..].find('>')? + start_pos + 1;
    let content_end = xml[content_start..].find(&close)? + content_start;

    Some(xml[content_start..content_end].trim().to_string())
}

/// 提取所有<link .../>标签的原始文本
fn extract_link_tags(xml: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut search_from = 0;

    while let Some(pos) = xml[search_from..].find("<link") {
        let start = search_from + pos;
        let Some(end_pos) = xml[start..].find('>') else {
            break;
        };
        let end = start + end_pos + 1;
        tags.push(xml[start..end].to_string());
        search_from = end;
    }

    tags
}

/// 从标签文本中提取属性值
fn extract_attribute(tag: &str, attr: &str) -> Option<String> {
    let search = format!("{}=\"", attr);
    let start = tag.find(&search)? + search.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

/// 压缩空白：将连续空白折叠为单个空格
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
