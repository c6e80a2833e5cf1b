//! Plain-text transcript rendering for archived posts.

use crate::api::types::{PostBody, PostContentBody};

/// Render a human-readable transcript of a post: title/creator/fee header,
/// timestamps, tags, then the body text.
pub fn render_transcript(post: &PostBody) -> String {
    let mut out = String::new();

    out.push_str(&format!("Title: {}\n", post.title));
    out.push_str(&format!("Creator: {}\n", post.creator_id));
    out.push_str(&format!("Fee required: {}\n", post.fee_required));
    out.push_str(&format!("Published: {}\n", post.published_datetime));
    out.push_str(&format!("Updated: {}\n", post.updated_datetime));
    out.push_str(&format!("Tags: {}\n", post.tags.join(", ")));
    out.push('\n');

    for paragraph in body_paragraphs(post) {
        out.push_str(&paragraph);
        out.push('\n');
    }

    out
}

/// The post's text content as a paragraph sequence.
fn body_paragraphs(post: &PostBody) -> Vec<String> {
    let Some(body) = &post.body else {
        return Vec::new();
    };

    match body {
        PostContentBody::Structured(content) => {
            if let Some(blocks) = &content.blocks {
                blocks
                    .iter()
                    .filter_map(|block| block.text.clone())
                    .collect()
            } else if let Some(text) = &content.text {
                text.lines().map(|line| line.to_string()).collect()
            } else {
                Vec::new()
            }
        }
        PostContentBody::Html(content) => content.paragraphs().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Block, StructuredContent};

    fn make_post(body: Option<PostContentBody>) -> PostBody {
        PostBody {
            id: "p1".to_string(),
            title: "A post".to_string(),
            fee_required: 500,
            published_datetime: "2023-02-01T10:00:00+09:00".to_string(),
            updated_datetime: "2023-02-02T12:30:00+09:00".to_string(),
            tags: vec!["art".to_string(), "wip".to_string()],
            is_restricted: false,
            creator_id: "c1".to_string(),
            cover_image_url: None,
            excerpt: String::new(),
            body,
        }
    }

    #[test]
    fn test_header_fields_present() {
        let transcript = render_transcript(&make_post(None));
        assert!(transcript.contains("Title: A post"));
        assert!(transcript.contains("Creator: c1"));
        assert!(transcript.contains("Fee required: 500"));
        assert!(transcript.contains("Updated: 2023-02-02T12:30:00+09:00"));
        assert!(transcript.contains("Tags: art, wip"));
    }

    #[test]
    fn test_block_text_rendered_in_order() {
        let content = StructuredContent {
            blocks: Some(vec![
                Block {
                    block_type: "p".to_string(),
                    text: Some("first".to_string()),
                    image_id: None,
                    file_id: None,
                },
                Block {
                    block_type: "image".to_string(),
                    text: None,
                    image_id: Some("i1".to_string()),
                    file_id: None,
                },
                Block {
                    block_type: "p".to_string(),
                    text: Some("second".to_string()),
                    image_id: None,
                    file_id: None,
                },
            ]),
            ..StructuredContent::default()
        };
        let transcript = render_transcript(&make_post(Some(PostContentBody::Structured(content))));
        let first = transcript.find("first").unwrap();
        let second = transcript.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_legacy_paragraphs_rendered() {
        let body = PostContentBody::Html(crate::content::HtmlContent::new(
            "<p>legacy text</p>",
        ));
        let transcript = render_transcript(&make_post(Some(body)));
        assert!(transcript.contains("legacy text"));
    }
}
