//! Site-map and content tree nodes.
//!
//! - [`SiteNode`] - a node of the hierarchy recovered from `data/document.js`
//! - [`ContentNode`] - the same node after the walk, with page content attached
//! - [`NodeKind`] - the `type` discriminant shared by both

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Node discriminant as emitted by the prototyping tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// Grouping node with child nodes.
    Folder,
    /// Renderable page with a `url`.
    Wireframe,
    /// Anything else; carried through untouched. Empty when the node has
    /// no string `type`.
    Other(String),
}

impl NodeKind {
    /// True when the node carried no string `type` of its own.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, NodeKind::Other(kind) if kind.is_empty())
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::Other(String::new())
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Folder" => NodeKind::Folder,
            "Wireframe" => NodeKind::Wireframe,
            _ => NodeKind::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Folder => "Folder".to_string(),
            NodeKind::Wireframe => "Wireframe".to_string(),
            NodeKind::Other(other) => other,
        }
    }
}

/// A node of the extracted site map.
///
/// Decoding never rejects a node for its shape. Keys that are missing or
/// not strings leave the typed field empty and stay in `extra` as given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteNode {
    #[serde(rename = "type", skip_serializing_if = "NodeKind::is_unspecified")]
    pub kind: NodeKind,
    /// Display name: `name` when the node has one, otherwise `pageName`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Page path relative to the document root (pages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SiteNode>>,
    /// Vendor fields the crawler does not interpret (`id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remove `key` from `fields` if it holds a string.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !fields.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for SiteNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        let kind = take_string(&mut fields, "type")
            .map(NodeKind::from)
            .unwrap_or_default();
        let name = if fields.contains_key("name") {
            take_string(&mut fields, "name")
        } else {
            take_string(&mut fields, "pageName")
        };
        let url = take_string(&mut fields, "url");
        let children = match fields.get("children") {
            Some(Value::Array(_)) => match fields.remove("children") {
                Some(children) => Some(serde_json::from_value(children).map_err(D::Error::custom)?),
                None => None,
            },
            _ => None,
        };

        Ok(Self {
            kind,
            name: name.unwrap_or_default(),
            url,
            children,
            extra: fields,
        })
    }
}

impl SiteNode {
    pub fn folder(name: impl Into<String>, children: Vec<SiteNode>) -> Self {
        Self {
            kind: NodeKind::Folder,
            name: name.into(),
            url: None,
            children: Some(children),
            extra: Map::new(),
        }
    }

    pub fn wireframe(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Wireframe,
            name: name.into(),
            url: Some(url.into()),
            children: None,
            extra: Map::new(),
        }
    }
}

/// A walked node. Page nodes carry `content` and, when rendering is
/// enabled, a `screenshot` path (empty if the capture failed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    #[serde(rename = "type", default, skip_serializing_if = "NodeKind::is_unspecified")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ContentNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentNode {
    /// Rebuild `node` with its children already walked.
    pub fn with_children(node: &SiteNode, children: Option<Vec<ContentNode>>) -> Self {
        Self {
            kind: node.kind.clone(),
            name: node.name.clone(),
            url: node.url.clone(),
            children,
            content: None,
            screenshot: None,
            extra: node.extra.clone(),
        }
    }

    /// Number of nodes in this subtree carrying `content`.
    pub fn page_count(&self) -> usize {
        let own = usize::from(self.content.is_some());
        own + self
            .children
            .iter()
            .flatten()
            .map(ContentNode::page_count)
            .sum::<usize>()
    }
}

impl From<&SiteNode> for ContentNode {
    fn from(node: &SiteNode) -> Self {
        let children = node
            .children
            .as_ref()
            .map(|children| children.iter().map(ContentNode::from).collect());
        ContentNode::with_children(node, children)
    }
}
