//! Tests for domain list input parsing (comments, blank lines, normalization).

use svcb_status::normalize_domain_line;

#[test]
fn test_comment_lines_skipped() {
    let lines = vec![
        "# This is a comment",
        "example.com",
        "# Another comment",
        "  # Comment with leading whitespace",
    ];

    let domains: Vec<String> = lines.iter().filter_map(|l| normalize_domain_line(l)).collect();
    assert_eq!(domains, vec!["example.com"]);
}

#[test]
fn test_blank_lines_skipped() {
    let lines = vec!["example.com", "", "   ", "\t\t", "rust-lang.org"];

    let domains: Vec<String> = lines.iter().filter_map(|l| normalize_domain_line(l)).collect();
    assert_eq!(domains, vec!["example.com", "rust-lang.org"]);
}

#[test]
fn test_mixed_comments_and_blanks() {
    let lines = vec![
        "# Header",
        "",
        "example.com",
        "# Middle comment",
        "   ",
        "rust-lang.org",
        "# Footer",
    ];

    let domains: Vec<String> = lines.iter().filter_map(|l| normalize_domain_line(l)).collect();
    assert_eq!(domains.len(), 2);
    assert_eq!(domains[0], "example.com");
    assert_eq!(domains[1], "rust-lang.org");
}

#[test]
fn test_url_style_input_normalized_to_host() {
    assert_eq!(
        normalize_domain_line("https://example.com/some/path"),
        Some("example.com".to_string())
    );
    assert_eq!(
        normalize_domain_line("http://example.com"),
        Some("example.com".to_string())
    );
}

#[test]
fn test_case_and_trailing_dot_normalized() {
    assert_eq!(
        normalize_domain_line("  Example.COM.  "),
        Some("example.com".to_string())
    );
}

#[test]
fn test_whitespace_trimmed() {
    assert_eq!(
        normalize_domain_line("   example.com   "),
        Some("example.com".to_string())
    );
}
