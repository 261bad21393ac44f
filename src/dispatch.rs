//! Prompt-driven choice between a full crawl and a single page.

use serde::Serialize;

use crate::crawler::PrdCrawler;
use crate::output::ToolReply;
use crate::Result;

/// Prompt words asking for the whole document ("all", "every", "entire").
pub const FULL_TREE_KEYWORDS: [&str; 3] = ["全部", "所有", "整体"];

const MIME_TEXT: &str = "text/plain";
const MIME_HTML: &str = "text/html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMode {
    FullTree,
    SinglePage,
}

impl FetchMode {
    pub fn from_prompt(prompt: &str) -> Self {
        if FULL_TREE_KEYWORDS.iter().any(|kw| prompt.contains(kw)) {
            FetchMode::FullTree
        } else {
            FetchMode::SinglePage
        }
    }
}

/// Run whichever fetch `prompt` asks for and render the result as text.
pub async fn smart_fetch(crawler: &PrdCrawler, url: &str, prompt: &str) -> Result<ToolReply> {
    let mode = FetchMode::from_prompt(prompt);
    tracing::debug!(?mode, "dispatching fetch");

    let reply = match mode {
        FetchMode::FullTree => {
            let report = crawler.crawl(url).await;
            ToolReply {
                text: serde_json::to_string_pretty(&report)?,
                mime_type: MIME_TEXT.to_string(),
            }
        }
        FetchMode::SinglePage => {
            let page = crawler.fetch_page(url).await;
            let mime_type = if page.is_failure() { MIME_TEXT } else { MIME_HTML };
            ToolReply {
                text: page.html,
                mime_type: mime_type.to_string(),
            }
        }
    };
    Ok(reply)
}
