use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

use crate::sitemap::SiteMapError;

#[derive(Debug, Error)]
pub enum PrdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Site map error: {0}")]
    SiteMap(#[from] SiteMapError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PrdError {
    pub fn http_status(url: impl Into<String>, status: StatusCode) -> Self {
        PrdError::HttpStatus {
            url: url.into(),
            status,
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        PrdError::Render(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            PrdError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions (screenshots directory, config file).",
            ),
            PrdError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and that the PRD host is reachable.",
            ),
            PrdError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Pass the full PRD URL including http(s)://, e.g. https://host/prd/#p=Home.",
            ),
            PrdError::HttpStatus { status, .. } => ErrorPayload::new(
                ErrorCategory::Network,
                self.to_string(),
                if *status == StatusCode::NOT_FOUND {
                    "The page or data/document.js does not exist; verify the PRD URL and page name."
                } else {
                    "The PRD host rejected the request; retry later or verify access."
                },
            ),
            PrdError::SiteMap(e) => ErrorPayload::new(
                ErrorCategory::SiteMap,
                e.to_string(),
                "Make sure the URL points at an exported prototype that ships data/document.js.",
            ),
            PrdError::Render(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("chrom") && (lower.contains("launch") || lower.contains("not found")) {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Install Chromium/Chrome or set PRD_CHROMIUM_PATH; use --no-screenshots to skip rendering.",
                    )
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Increase [timeouts] navigation/network_idle in the config file.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Re-run with --verbose for browser details; use --no-screenshots to skip rendering.",
                    )
                }
            }
            PrdError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Unknown,
                e.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
            PrdError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("viewport") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use WIDTHxHEIGHT with positive values (e.g., 1920x1080).",
                    )
                } else if lower.contains("timeout") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Timeouts must be positive durations such as \"30s\" or \"2m\".",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the TOML config file.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PrdError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    SiteMap,
    Render,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sitemap_payload_points_at_document_js() {
        let err = PrdError::SiteMap(SiteMapError::PatternNotFound);
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::SiteMap);
        let remediation = payload.remediation.unwrap_or_default();
        assert!(
            remediation.contains("data/document.js"),
            "expected remediation to mention document.js, got: {remediation}"
        );
    }

    #[test]
    fn not_found_status_gets_page_hint() {
        let err = PrdError::http_status("https://h.example/doc/Foo.html", StatusCode::NOT_FOUND);
        let payload = err.to_payload();
        assert_eq!(payload.category, ErrorCategory::Network);
        assert!(payload.message.contains("404"));
        assert!(payload
            .remediation
            .unwrap_or_default()
            .contains("page name"));
    }

    #[test]
    fn render_launch_failure_suggests_chromium_install() {
        let err = PrdError::render("failed to launch Chromium: executable not found");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("PRD_CHROMIUM_PATH"),
            "expected chromium remediation, got: {remediation}"
        );
    }

    #[test]
    fn render_timeout_suggests_timeouts() {
        let err = PrdError::render("navigation timed out after 30000ms");
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("network_idle"));
    }

    #[test]
    fn config_payload_uses_viewport_hint() {
        let err = PrdError::Config("Invalid viewport: width must be positive".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(remediation.contains("1920x1080"));
    }

    #[test]
    fn config_payload_uses_default_remediation_for_other_messages() {
        let err = PrdError::Config("Some other config issue".to_string());
        let remediation = err.to_payload().remediation.unwrap_or_default();
        assert!(
            remediation.contains("Check flags/paths"),
            "expected default remediation for generic config errors"
        );
    }
}
