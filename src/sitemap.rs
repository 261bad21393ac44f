//! Site-map recovery from the prototype's `data/document.js`.
//!
//! The exported document does not ship its page tree as JSON. The tree is
//! built at load time by an immediately-invoked factory of the form
//! `(function() { ... return _creator(); })()`. We cut that expression out of
//! the script and run it, and nothing else from the file, inside a fresh
//! `boa_engine` context that has no host functions registered.

use std::sync::OnceLock;

use boa_engine::{Context, Source};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::fetcher::PageSource;
use crate::types::SiteNode;
use crate::Result;

/// Location of the site-map script relative to the canonical page URL.
pub const DOCUMENT_SCRIPT_PATH: &str = "data/document.js";

const LOOP_ITERATION_LIMIT: u64 = 1_000_000;
const RECURSION_LIMIT: usize = 512;
const STACK_SIZE_LIMIT: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum SiteMapError {
    #[error("pattern not found: no `(function() {{ ... return _creator(); }})()` block in document script")]
    PatternNotFound,
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    #[error("unexpected site map structure: {0}")]
    Structure(String),
}

#[derive(Debug, Deserialize)]
struct DocumentPayload {
    sitemap: SiteMapPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteMapPayload {
    root_nodes: Vec<SiteNode>,
}

fn creator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\(\s*function\s*\(\)\s*\{[\s\S]*?return _creator\(\);\s*\}\s*\)\s*\(\s*\)",
        )
        .expect("valid creator regex")
    })
}

/// URL of the site-map script for a canonical page URL.
pub fn document_script_url(canonical_url: &Url) -> Result<Url> {
    Ok(canonical_url.join(DOCUMENT_SCRIPT_PATH)?)
}

/// Find the first `_creator` factory expression in `script`.
pub fn find_creator_expression(script: &str) -> std::result::Result<&str, SiteMapError> {
    creator_re()
        .find(script)
        .map(|m| m.as_str())
        .ok_or(SiteMapError::PatternNotFound)
}

/// Evaluate a factory expression in an isolated context and return its value as JSON.
///
/// The value is serialized by the engine's own `JSON.stringify`, captured
/// before the factory runs. Functions and `undefined` members are dropped
/// and cycles are reported as errors.
pub fn evaluate_expression(expression: &str) -> std::result::Result<serde_json::Value, SiteMapError> {
    let mut context = Context::default();
    let limits = context.runtime_limits_mut();
    limits.set_loop_iteration_limit(LOOP_ITERATION_LIMIT);
    limits.set_recursion_limit(RECURSION_LIMIT);
    limits.set_stack_size_limit(STACK_SIZE_LIMIT);

    let program =
        format!("(function (stringify) {{ return stringify({expression}); }})(JSON.stringify)");
    let value = context
        .eval(Source::from_bytes(program.as_bytes()))
        .map_err(|e| SiteMapError::Evaluation(e.to_string()))?;

    let Some(text) = value.as_string() else {
        return Err(SiteMapError::Evaluation(
            "factory did not return a JSON value".to_string(),
        ));
    };
    serde_json::from_str(&text.to_std_string_escaped())
        .map_err(|e| SiteMapError::Evaluation(e.to_string()))
}

/// Extract `sitemap.rootNodes` from the text of `document.js`.
pub fn parse_document_script(script: &str) -> std::result::Result<Vec<SiteNode>, SiteMapError> {
    let expression = find_creator_expression(script)?;
    debug!(bytes = expression.len(), "evaluating site map factory");
    let value = evaluate_expression(expression)?;
    let payload: DocumentPayload =
        serde_json::from_value(value).map_err(|e| SiteMapError::Structure(e.to_string()))?;
    Ok(payload.sitemap.root_nodes)
}

/// Fetch and decode the site map that belongs to `canonical_url`.
pub async fn load_site_map(source: &dyn PageSource, canonical_url: &Url) -> Result<Vec<SiteNode>> {
    let script_url = document_script_url(canonical_url)?;
    info!(%script_url, "loading site map");
    let script = source.fetch_text(&script_url).await?;
    let nodes = parse_document_script(&script)?;
    info!(root_nodes = nodes.len(), "site map loaded");
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    const DOCUMENT_JS: &str = r#"
$axure.loadDocument(
(function() {
    var _ = function() { var r={},a=arguments; for(var i=0; i<a.length; i+=2) r[a[i]]=a[i+1]; return r; }
    var _creator = function() { return _(b,_(c,[_(d,e,f,g,h,i,j,[_(d,k,f,n,h,l)]),_(d,m,f,n,h,o)]),p,_(q,r)); };
    var b="sitemap",c="rootNodes",d="pageName",e="Orders",f="type",g="Folder",h="url",i="",j="children",
    k="Order List",l="Order_List.html",m="Home",n="Wireframe",o="Home.html",p="configuration",q="showPageNotes",r=true;
    return _creator();
})());
"#;

    #[test]
    fn url_is_relative_to_canonical_page() {
        let page = Url::parse("https://h.example/doc/Foo.html").unwrap();
        assert_eq!(
            document_script_url(&page).unwrap().as_str(),
            "https://h.example/doc/data/document.js"
        );
    }

    #[test]
    fn finds_only_the_factory_expression() {
        let expr = find_creator_expression(DOCUMENT_JS).unwrap();
        assert!(expr.starts_with("(function()"));
        assert!(expr.ends_with("})()"));
        assert!(!expr.contains("$axure"));
    }

    #[test]
    fn extracts_root_nodes() {
        let nodes = parse_document_script(DOCUMENT_JS).unwrap();
        assert_eq!(nodes.len(), 2);

        let orders = &nodes[0];
        assert_eq!(orders.kind, NodeKind::Folder);
        assert_eq!(orders.name, "Orders");
        let children = orders.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, NodeKind::Wireframe);
        assert_eq!(children[0].url.as_deref(), Some("Order_List.html"));

        assert_eq!(nodes[1].name, "Home");
        assert_eq!(nodes[1].url.as_deref(), Some("Home.html"));
    }

    #[test]
    fn missing_factory_is_pattern_not_found() {
        let err = parse_document_script("var x = 1; console.log(x);").unwrap_err();
        assert!(matches!(err, SiteMapError::PatternNotFound));
        assert!(err.to_string().contains("pattern not found"));
    }

    #[test]
    fn throwing_factory_is_evaluation_error() {
        let script = "(function() { throw new Error('boom'); return _creator(); })()";
        let err = parse_document_script(script).unwrap_err();
        assert!(matches!(err, SiteMapError::Evaluation(_)));
    }

    #[test]
    fn factory_without_sitemap_is_structure_error() {
        let script =
            "(function() { var _creator = function() { return { pages: [] }; }; return _creator(); })()";
        let err = parse_document_script(script).unwrap_err();
        assert!(matches!(err, SiteMapError::Structure(_)));
    }

    #[test]
    fn host_capabilities_are_not_exposed() {
        let script = "(function() { var _creator = function() { return { sitemap: { rootNodes: [] }, host: [typeof require, typeof process, typeof fetch, typeof XMLHttpRequest] }; }; return _creator(); })()";
        let value = evaluate_expression(script).unwrap();
        assert_eq!(
            value["host"],
            serde_json::json!(["undefined", "undefined", "undefined", "undefined"])
        );
    }

    #[test]
    fn undefined_members_are_dropped() {
        let script = "(function() { var _creator = function() { return { sitemap: { rootNodes: [{ type: 'Wireframe', pageName: 'A', url: 'a.html', notes: undefined }] } }; }; return _creator(); })()";
        let nodes = parse_document_script(script).unwrap();
        assert_eq!(nodes[0].url.as_deref(), Some("a.html"));
        assert!(nodes[0].extra.get("notes").is_none());
    }

    #[test]
    fn odd_arity_helper_call_is_tolerated() {
        let script = r#"(function() {
    var _ = function() { var r={},a=arguments; for(var i=0; i<a.length; i+=2) r[a[i]]=a[i+1]; return r; }
    var _creator = function() { return _("sitemap",_("rootNodes",[_("pageName","A","type","Wireframe","url","a.html","notes")])); };
    return _creator();
})()"#;
        let nodes = parse_document_script(script).unwrap();
        assert_eq!(nodes[0].name, "A");
        assert!(nodes[0].extra.is_empty());
    }

    #[test]
    fn function_members_are_dropped() {
        let script = "(function() { var _creator = function() { return { sitemap: { rootNodes: [{ type: 'Wireframe', pageName: 'A', url: 'a.html', onLoad: function() { return 1; } }] } }; }; return _creator(); })()";
        let nodes = parse_document_script(script).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].extra.get("onLoad").is_none());
    }

    #[test]
    fn cyclic_value_is_evaluation_error() {
        let script = "(function() { var _creator = function() { var o = { type: 'Folder' }; o.self = o; return { sitemap: { rootNodes: [o] } }; }; return _creator(); })()";
        let err = parse_document_script(script).unwrap_err();
        assert!(matches!(err, SiteMapError::Evaluation(_)), "{err}");
    }

    #[test]
    fn undefined_result_is_evaluation_error() {
        let script = "(function() { var _creator = function() {}; return _creator(); })()";
        let err = parse_document_script(script).unwrap_err();
        assert!(matches!(err, SiteMapError::Evaluation(_)));
    }

    #[test]
    fn node_without_type_does_not_sink_the_map() {
        let script = "(function() { var _creator = function() { return { sitemap: { rootNodes: [{ pageName: 'Loose' }, { type: 'Wireframe', pageName: 'A', url: 'a.html' }] } }; }; return _creator(); })()";
        let nodes = parse_document_script(script).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].kind.is_unspecified());
        assert_eq!(nodes[1].kind, NodeKind::Wireframe);
    }

    #[test]
    fn runaway_loop_is_stopped() {
        let script = "(function() { while (true) {} return _creator(); })()";
        let err = parse_document_script(script).unwrap_err();
        assert!(matches!(err, SiteMapError::Evaluation(_)));
    }

    #[test]
    fn surrounding_code_is_never_run() {
        let script = format!("throw new Error('outside');\n{DOCUMENT_JS}");
        assert_eq!(parse_document_script(&script).unwrap().len(), 2);
    }
}
