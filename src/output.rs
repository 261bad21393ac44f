use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::types::ContentNode;

/// Result of a full-tree crawl.
///
/// Serializes as `{"success":true,"tree":[...]}` or
/// `{"success":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Vec<ContentNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrawlReport {
    pub fn ok(tree: Vec<ContentNode>) -> Self {
        Self {
            success: true,
            tree: Some(tree),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tree: None,
            error: Some(error.into()),
        }
    }

    /// Pages carrying content across the whole tree.
    pub fn page_count(&self) -> usize {
        self.tree
            .iter()
            .flatten()
            .map(ContentNode::page_count)
            .sum()
    }
}

/// Result of a single-page fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    /// Normalized html, or a failure message.
    pub html: String,
    /// Screenshot path; empty when not captured.
    pub screenshot: String,
    #[serde(skip)]
    pub(crate) fetch_failed: bool,
}

impl PageReport {
    pub fn new(html: String, screenshot: String) -> Self {
        Self {
            html,
            screenshot,
            fetch_failed: false,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            html: message,
            screenshot: String::new(),
            fetch_failed: true,
        }
    }

    /// Whether `html` holds a failure message rather than page markup.
    pub fn is_failure(&self) -> bool {
        self.fetch_failed
    }
}

/// Text reply with a content type, as handed back to a tool caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolReply {
    pub text: String,
    pub mime_type: String,
}

/// Envelope printed by the CLI for fatal errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub error: ErrorPayload,
}
