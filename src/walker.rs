//! Concurrent traversal of the site map.
//!
//! Every sibling of a level is visited at once and the level resolves only
//! when all of them have, so the output keeps the input's shape and order.
//! A page that cannot be fetched or rendered is recorded in place; it never
//! fails the walk.

use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use tracing::{debug, warn};
use url::Url;

use crate::browser::{RenderingSession, SessionManager};
use crate::fetcher::PageSource;
use crate::normalize::normalize_html;
use crate::types::{ContentNode, NodeKind, SiteNode};

/// Prefix of the `content` recorded for a page that could not be fetched.
pub const PAGE_FETCH_FAILURE: &str = "Failed to fetch page";

struct Screenshots<'a> {
    manager: &'a SessionManager,
    session: Arc<RenderingSession>,
}

/// Turns [`SiteNode`]s into [`ContentNode`]s.
pub struct TreeWalker<'a> {
    source: &'a dyn PageSource,
    base: &'a Url,
    screenshots: Option<Screenshots<'a>>,
}

impl<'a> TreeWalker<'a> {
    /// Walker resolving page urls against `base`, the canonical page URL.
    pub fn new(source: &'a dyn PageSource, base: &'a Url) -> Self {
        Self {
            source,
            base,
            screenshots: None,
        }
    }

    /// Capture every fetched page on `session`.
    pub fn with_screenshots(
        mut self,
        manager: &'a SessionManager,
        session: Arc<RenderingSession>,
    ) -> Self {
        self.screenshots = Some(Screenshots { manager, session });
        self
    }

    pub async fn walk(&self, nodes: &[SiteNode]) -> Vec<ContentNode> {
        join_all(nodes.iter().map(|node| self.walk_node(node))).await
    }

    fn walk_node<'s>(&'s self, node: &'s SiteNode) -> BoxFuture<'s, ContentNode> {
        async move {
            match (&node.kind, &node.url, &node.children) {
                (NodeKind::Wireframe, Some(url), children) if !url.is_empty() => {
                    let children_walk = async {
                        match children {
                            Some(children) => Some(self.walk(children).await),
                            None => None,
                        }
                    };
                    let ((content, screenshot), children) =
                        futures::join!(self.visit_page(&node.name, url), children_walk);

                    let mut out = ContentNode::with_children(node, children);
                    out.content = Some(content);
                    out.screenshot = screenshot;
                    out
                }
                (NodeKind::Folder, _, Some(children)) => {
                    let children = self.walk(children).await;
                    ContentNode::with_children(node, Some(children))
                }
                (NodeKind::Folder, _, None)
                | (NodeKind::Wireframe, _, _)
                | (NodeKind::Other(_), _, _) => ContentNode::from(node),
            }
        }
        .boxed()
    }

    /// Fetch one page and, when rendering, capture it.
    ///
    /// Returns the normalized html (or a failure message) and the screenshot
    /// path, which is empty when the capture did not happen or failed.
    async fn visit_page(&self, name: &str, relative: &str) -> (String, Option<String>) {
        let skipped = || self.screenshots.as_ref().map(|_| String::new());

        let target = match self.base.join(relative) {
            Ok(target) => target,
            Err(err) => {
                warn!(page = name, url = relative, "invalid page url: {err}");
                return (
                    format!("{PAGE_FETCH_FAILURE}: {}", crate::PrdError::from(err)),
                    skipped(),
                );
            }
        };

        let html = match self.source.fetch_text(&target).await {
            Ok(html) => html,
            Err(err) => {
                warn!(page = name, url = %target, "page fetch failed: {err}");
                return (format!("{PAGE_FETCH_FAILURE}: {err}"), skipped());
            }
        };
        let content = normalize_html(&html);
        debug!(page = name, bytes = content.len(), "page fetched");

        let screenshot = match &self.screenshots {
            Some(shots) => {
                match shots
                    .manager
                    .capture(&shots.session, target.as_str(), name)
                    .await
                {
                    Ok(path) => Some(path.display().to_string()),
                    Err(err) => {
                        warn!(page = name, url = %target, "screenshot failed: {err}");
                        Some(String::new())
                    }
                }
            }
            None => None,
        };

        (content, screenshot)
    }
}
