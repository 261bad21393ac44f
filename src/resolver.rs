//! Canonical page URL derivation for fragment-addressed PRD links.
//!
//! Exported prototypes are usually shared as `https://host/prd/#id=abc&p=Page&g=1`,
//! where the fragment names the page. The page itself lives at
//! `https://host/prd/Page.html`.

use serde::Serialize;
use url::form_urlencoded;

/// Fragment parameter holding the page identifier.
const PAGE_PARAM: &str = "p";

/// A resolved entry URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedUrl {
    pub canonical_url: String,
    /// Decoded `p` fragment parameter, empty when absent.
    pub page_name: String,
}

/// Resolve an entry URL to its canonical page URL.
///
/// Only the first `#` delimits the fragment. Inputs without a fragment, or
/// whose fragment has no non-empty `p` parameter, are returned unchanged.
pub fn resolve_url(input: &str) -> ResolvedUrl {
    let Some((base, fragment)) = input.split_once('#') else {
        return ResolvedUrl {
            canonical_url: input.to_string(),
            page_name: String::new(),
        };
    };

    let page_name = form_urlencoded::parse(fragment.as_bytes())
        .find(|(key, _)| key == PAGE_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();

    if page_name.is_empty() {
        return ResolvedUrl {
            canonical_url: input.to_string(),
            page_name,
        };
    }

    ResolvedUrl {
        canonical_url: format!("{base}{page_name}.html"),
        page_name,
    }
}
