//! Post content resolution.
//!
//! Normalizes the two content shapes the API serves into the flat media and
//! text sequences the downloader consumes.

pub mod html;

pub use html::{HtmlContent, ParsedHtml};

use crate::api::types::{FileInfo, ImageInfo, PostContentBody, StructuredContent};

/// A post's content normalized for downloading.
#[derive(Debug, Clone)]
pub enum ResolvedContent {
    /// Block-formatted post: typed image and file attachments.
    Structured {
        images: Vec<ImageInfo>,
        files: Vec<FileInfo>,
    },
    /// Legacy HTML post: bare URLs extracted from the markup.
    Legacy {
        paragraphs: Vec<String>,
        file_urls: Vec<String>,
        thumbnail_urls: Vec<String>,
    },
}

/// Normalize a post content body.
pub fn resolve(body: &PostContentBody) -> ResolvedContent {
    match body {
        PostContentBody::Structured(content) => ResolvedContent::Structured {
            images: merged_images(content),
            files: merged_files(content),
        },
        PostContentBody::Html(content) => {
            let parsed = content.parsed();
            ResolvedContent::Legacy {
                paragraphs: parsed.paragraphs.clone(),
                file_urls: parsed.file_urls.clone(),
                thumbnail_urls: parsed.thumbnail_urls.clone(),
            }
        }
    }
}

/// Merge the list-keyed and map-keyed image collections, list entries
/// first. Entries are not deduplicated across the two sources; the API has
/// not been observed to repeat a media id across both for the same post.
pub fn merged_images(content: &StructuredContent) -> Vec<ImageInfo> {
    let mut merged = content.images.clone().unwrap_or_default();
    if let Some(map) = &content.image_map {
        merged.extend(map.values().cloned());
    }
    merged
}

/// Same merge policy as [`merged_images`], for file attachments.
pub fn merged_files(content: &StructuredContent) -> Vec<FileInfo> {
    let mut merged = content.files.clone().unwrap_or_default();
    if let Some(map) = &content.file_map {
        merged.extend(map.values().cloned());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn image(id: &str) -> ImageInfo {
        ImageInfo {
            id: id.to_string(),
            extension: "png".to_string(),
            width: 0,
            height: 0,
            original_url: format!("https://example.com/{}.png", id),
            thumbnail_url: format!("https://example.com/thumb/{}.png", id),
        }
    }

    fn file(id: &str) -> FileInfo {
        FileInfo {
            id: id.to_string(),
            name: id.to_string(),
            extension: "zip".to_string(),
            size: 0,
            url: format!("https://example.com/{}.zip", id),
        }
    }

    #[test]
    fn test_list_entries_precede_map_entries() {
        let content = StructuredContent {
            images: Some(vec![image("list0")]),
            image_map: Some(BTreeMap::from([("k".to_string(), image("map0"))])),
            ..StructuredContent::default()
        };

        let merged = merged_images(&content);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "list0");
        assert_eq!(merged[1].id, "map0");
    }

    #[test]
    fn test_duplicate_ids_across_sources_are_kept() {
        // Known limitation: the same media appearing in both representations
        // is downloaded once per occurrence (same target filename).
        let content = StructuredContent {
            files: Some(vec![file("f1")]),
            file_map: Some(BTreeMap::from([("f1".to_string(), file("f1"))])),
            ..StructuredContent::default()
        };

        let merged = merged_files(&content);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_map_only_content() {
        let content = StructuredContent {
            image_map: Some(BTreeMap::from([
                ("b".to_string(), image("b")),
                ("a".to_string(), image("a")),
            ])),
            ..StructuredContent::default()
        };

        // BTreeMap iteration keeps the order stable across runs.
        let merged = merged_images(&content);
        assert_eq!(merged[0].id, "a");
        assert_eq!(merged[1].id, "b");
    }

    #[test]
    fn test_resolve_legacy_clones_parsed_sequences() {
        let body = PostContentBody::Html(HtmlContent::new(
            r#"<p>text</p><img src="https://example.com/t.jpg">"#,
        ));
        match resolve(&body) {
            ResolvedContent::Legacy {
                paragraphs,
                thumbnail_urls,
                ..
            } => {
                assert_eq!(paragraphs, vec!["text".to_string()]);
                assert_eq!(thumbnail_urls, vec!["https://example.com/t.jpg".to_string()]);
            }
            ResolvedContent::Structured { .. } => panic!("expected legacy variant"),
        }
    }
}
