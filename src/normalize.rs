//! Markup reduction for fetched pages.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid script regex")
    })
}

/// Strip `<script>` elements and collapse whitespace runs to single spaces.
///
/// Unterminated script tags are kept. The result is a fixed point:
/// normalizing it again returns it unchanged.
pub fn normalize_html(html: &str) -> String {
    let mut text = html.to_string();
    // Removing one element can splice a new one together from its neighbours.
    while script_re().is_match(&text) {
        text = script_re().replace_all(&text, "").into_owned();
    }
    whitespace_re().replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_scripts_and_keeps_content() {
        let out = normalize_html("<div>A</div><script>alert(1)</script><p>B</p>");
        assert_eq!(out, "<div>A</div><p>B</p>");
        assert!(!out.contains("script"));
    }

    #[test]
    fn removes_scripts_with_attributes_and_mixed_case() {
        let out = normalize_html(
            "<p>x</p><SCRIPT type=\"text/javascript\" src=\"a.js\"></SCRIPT><p>y</p><Script>\nvar a = 1;\n</sCrIpT>",
        );
        assert_eq!(out, "<p>x</p><p>y</p>");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        let out = normalize_html("  <div>\n\t  A \r\n  B</div>   ");
        assert_eq!(out, "<div> A B</div>");
    }

    #[test]
    fn non_greedy_between_scripts() {
        let out = normalize_html("<script>a</script>keep<script>b</script>");
        assert_eq!(out, "keep");
    }

    #[test]
    fn unterminated_script_is_left_alone() {
        let out = normalize_html("<p>x</p><script>never closed");
        assert_eq!(out, "<p>x</p><script>never closed");
    }

    #[test]
    fn scriptless_tag_names_are_not_stripped() {
        let out = normalize_html("<scripts>x</scripts>");
        assert_eq!(out, "<scripts>x</scripts>");
    }

    #[test]
    fn spliced_script_is_also_removed() {
        let out = normalize_html("<scr<script></script>ipt>alert(1)</script>ok");
        assert_eq!(out, "ok");
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let inputs = [
            "<div>A</div> <script>x</script> <p>B</p>",
            "  a\n\nb  ",
            "<p>x</p><script>never closed",
            "<scr<script></script>ipt>alert(1)</script>ok",
            "",
        ];
        for input in inputs {
            let once = normalize_html(input);
            assert_eq!(normalize_html(&once), once, "input: {input:?}");
        }
    }
}
