use prd_lib::{PrdError, SiteMapError};

#[test]
fn config_error_display_includes_message() {
    let err = PrdError::Config("missing viewport".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing viewport");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: PrdError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn http_status_helper_includes_status_and_url() {
    let err = PrdError::http_status(
        "https://h.example/doc/data/document.js",
        reqwest::StatusCode::NOT_FOUND,
    );

    assert_eq!(
        format!("{}", err),
        "HTTP 404 Not Found for https://h.example/doc/data/document.js"
    );
}

#[test]
fn site_map_errors_are_wrapped() {
    let err: PrdError = SiteMapError::PatternNotFound.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("Site map error: pattern not found"));
}

#[test]
fn render_helper_uses_message() {
    let err = PrdError::render("navigation timed out after 30000ms");

    assert_eq!(
        format!("{}", err),
        "Render error: navigation timed out after 30000ms"
    );
}
