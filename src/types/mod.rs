mod node;

pub use node::{ContentNode, NodeKind, SiteNode};
