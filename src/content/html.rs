//! Legacy HTML post content.
//!
//! Posts from before the platform's editor rework carry their whole body as
//! one raw HTML string. A best-effort regex extraction derives text
//! paragraphs, file links and thumbnail images from it; the extraction runs
//! at most once per post and the result is cached.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

/// Raw HTML post body with a lazily-derived, computed-once parse result.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlContent {
    pub html: String,
    #[serde(skip)]
    parsed: OnceLock<ParsedHtml>,
}

/// Sequences extracted from a legacy HTML body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHtml {
    /// Inline text with tags stripped, one entry per tag pair.
    pub paragraphs: Vec<String>,
    /// Anchor href targets that look like downloadable files.
    pub file_urls: Vec<String>,
    /// Image src targets.
    pub thumbnail_urls: Vec<String>,
}

impl HtmlContent {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            parsed: OnceLock::new(),
        }
    }

    /// Parse result for this body. The first caller performs the
    /// extraction; concurrent first-callers race on a single initialization
    /// and every later call returns the cached value.
    pub fn parsed(&self) -> &ParsedHtml {
        self.parsed.get_or_init(|| parse_html(&self.html))
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.parsed().paragraphs
    }

    pub fn file_urls(&self) -> &[String] {
        &self.parsed().file_urls
    }

    pub fn thumbnail_urls(&self) -> &[String] {
        &self.parsed().thumbnail_urls
    }
}

fn parse_html(html: &str) -> ParsedHtml {
    let tag = Regex::new(r"<[^>]*>").unwrap();
    let tag_pair = Regex::new(r"<[^>]*>(.*?)</[^>]*>").unwrap();
    let anchor = Regex::new(r#"<a[^>]*?href="([^"]*)"[^>]*?>"#).unwrap();
    let img = Regex::new(r#"<img[^>]*?src="([^"]*)"[^>]*?>"#).unwrap();

    let mut parsed = ParsedHtml::default();

    for cap in tag_pair.captures_iter(html) {
        let content = tag.replace_all(&cap[1], "");
        if !content.is_empty() {
            parsed.paragraphs.push(content.into_owned());
        }
    }

    for cap in anchor.captures_iter(html) {
        let href = &cap[1];
        if has_file_extension(href) {
            parsed.file_urls.push(href.to_string());
        }
    }

    for cap in img.captures_iter(html) {
        parsed.thumbnail_urls.push(cap[1].to_string());
    }

    parsed
}

/// True when a href target ends in a plausible file extension. Script
/// endpoints (`.php`) and bare page links are not downloadable files.
fn has_file_extension(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url);
    let Some(dot) = path.rfind('.') else {
        return false;
    };
    let ext = &path[dot + 1..];
    !ext.is_empty()
        && ext.len() <= 10
        && ext != "php"
        && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const SAMPLE: &str = concat!(
        r#"<p>First paragraph</p>"#,
        r#"<p><strong>Second</strong></p>"#,
        r#"<a href="https://dl.example.com/archive.zip">download</a>"#,
        r#"<a href="https://example.com/page.php?id=1">not a file</a>"#,
        r#"<img src="https://img.example.com/t1.jpg">"#,
    );

    #[test]
    fn test_extracts_paragraphs_without_tags() {
        let content = HtmlContent::new(SAMPLE);
        let paragraphs = content.paragraphs();
        assert!(paragraphs.contains(&"First paragraph".to_string()));
        assert!(paragraphs.contains(&"Second".to_string()));
    }

    #[test]
    fn test_extracts_file_urls_skipping_scripts() {
        let content = HtmlContent::new(SAMPLE);
        assert_eq!(
            content.file_urls(),
            &["https://dl.example.com/archive.zip".to_string()]
        );
    }

    #[test]
    fn test_extracts_thumbnail_urls() {
        let content = HtmlContent::new(SAMPLE);
        assert_eq!(
            content.thumbnail_urls(),
            &["https://img.example.com/t1.jpg".to_string()]
        );
    }

    #[test]
    fn test_parse_runs_once_across_accessors() {
        let content = HtmlContent::new(SAMPLE);
        let first = content.parsed() as *const ParsedHtml;
        content.file_urls();
        content.thumbnail_urls();
        let second = content.parsed() as *const ParsedHtml;
        // Same cached value, not a re-parse.
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_first_callers_share_one_result() {
        let content = Arc::new(HtmlContent::new(SAMPLE));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let content = Arc::clone(&content);
                std::thread::spawn(move || content.parsed() as *const ParsedHtml as usize)
            })
            .collect();
        let pointers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_has_file_extension() {
        assert!(has_file_extension("https://example.com/a.zip"));
        assert!(has_file_extension("https://example.com/a.jpg?token=x"));
        assert!(!has_file_extension("https://example.com/page.php"));
        assert!(!has_file_extension("https://example.com/page"));
    }
}
