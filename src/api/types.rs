//! FANBOX API response type definitions.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::content::HtmlContent;

/// Generic API response envelope.
///
/// Every FANBOX endpoint wraps its payload in `{"body": ..., "error": ...}`;
/// a present `error` field signals a logical failure (e.g. an expired
/// session) even when the HTTP status is 200.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub body: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A creator the session is subscribed to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingCreator {
    pub creator_id: String,
    #[serde(default)]
    pub fee: i64,
    #[serde(default)]
    pub title: String,
}

/// A post as it appears in a creator's paged listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fee_required: i64,
    pub published_datetime: String,
    pub updated_datetime: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_restricted: bool,
    pub creator_id: String,
}

/// One page of a creator's post listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPageBody {
    #[serde(default)]
    pub items: Vec<PostSummary>,
    #[serde(default)]
    pub next_url: Option<String>,
}

/// Full post detail.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fee_required: i64,
    pub published_datetime: String,
    pub updated_datetime: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_restricted: bool,
    pub creator_id: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    /// Absent when the session has no access to the post.
    #[serde(default)]
    pub body: Option<PostContentBody>,
}

/// A post detail paired with the unparsed response payload it came from.
///
/// The original payload is persisted verbatim alongside the parsed form so
/// the archive keeps everything the API returned, parsed or not.
#[derive(Debug, Clone)]
pub struct PostWithRaw {
    pub body: PostBody,
    pub raw: String,
}

/// Post content, in one of the two shapes the API serves.
///
/// Structured posts carry block/media-map JSON; posts from before the
/// platform's editor rework carry a single raw HTML string. The variant is
/// immutable once deserialized.
#[derive(Debug, Clone)]
pub enum PostContentBody {
    Structured(StructuredContent),
    Html(HtmlContent),
}

impl<'de> Deserialize<'de> for PostContentBody {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An `html` field always selects the legacy variant, whatever else
        // is present.
        let value = Value::deserialize(deserializer)?;
        if value.get("html").is_some() {
            let content = HtmlContent::deserialize(value).map_err(D::Error::custom)?;
            Ok(PostContentBody::Html(content))
        } else {
            let content = StructuredContent::deserialize(value).map_err(D::Error::custom)?;
            Ok(PostContentBody::Structured(content))
        }
    }
}

/// Block/media-map formatted post content.
///
/// Images and files can arrive in a map-keyed and a list-keyed
/// representation at the same time; `BTreeMap` keeps the map-side ordering
/// stable across runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredContent {
    #[serde(default)]
    pub blocks: Option<Vec<Block>>,
    #[serde(default)]
    pub image_map: Option<BTreeMap<String, ImageInfo>>,
    #[serde(default)]
    pub images: Option<Vec<ImageInfo>>,
    #[serde(default)]
    pub file_map: Option<BTreeMap<String, FileInfo>>,
    #[serde(default)]
    pub files: Option<Vec<FileInfo>>,
    #[serde(default)]
    pub embed_map: Option<BTreeMap<String, EmbedInfo>>,
    #[serde(default)]
    pub text: Option<String>,
}

/// One ordered content block of a structured post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
}

/// An image attached to a structured post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: String,
    pub extension: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub original_url: String,
    pub thumbnail_url: String,
}

/// A file attached to a structured post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub extension: String,
    #[serde(default)]
    pub size: u64,
    pub url: String,
}

/// Embedded third-party content. Tolerated in payloads; not downloaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedInfo {
    pub id: String,
    #[serde(default)]
    pub service_provider: String,
    #[serde(default)]
    pub content_id: String,
}

/// A recently-touched post reported by the platform-wide update listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub id: String,
    pub updated_datetime: String,
    pub is_restricted: bool,
}

/// Body of the recent-updates listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesBody {
    #[serde(default)]
    pub items: Vec<UpdateEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_field_selects_legacy_variant() {
        // Other fields present must not override the selection.
        let body: PostContentBody = serde_json::from_str(
            r#"{"html": "<p>old post</p>", "text": "ignored", "blocks": []}"#,
        )
        .unwrap();
        assert!(matches!(body, PostContentBody::Html(_)));
    }

    #[test]
    fn test_absent_html_selects_structured_variant() {
        let body: PostContentBody =
            serde_json::from_str(r#"{"blocks": [{"type": "p", "text": "hi"}]}"#).unwrap();
        match body {
            PostContentBody::Structured(content) => {
                let blocks = content.blocks.unwrap();
                assert_eq!(blocks.len(), 1);
                assert_eq!(blocks[0].block_type, "p");
                assert_eq!(blocks[0].text.as_deref(), Some("hi"));
            }
            PostContentBody::Html(_) => panic!("expected structured variant"),
        }
    }

    #[test]
    fn test_envelope_error_field() {
        let envelope: Envelope<Vec<SupportingCreator>> =
            serde_json::from_str(r#"{"error": "general_error"}"#).unwrap();
        assert!(envelope.body.is_none());
        assert_eq!(envelope.error.as_deref(), Some("general_error"));
    }

    #[test]
    fn test_post_body_without_access() {
        let body: PostBody = serde_json::from_str(
            r#"{
                "id": "123",
                "title": "t",
                "feeRequired": 500,
                "publishedDatetime": "2023-02-01T10:00:00+09:00",
                "updatedDatetime": "2023-02-01T10:00:00+09:00",
                "tags": [],
                "isRestricted": true,
                "creatorId": "c1",
                "coverImageUrl": null,
                "body": null,
                "excerpt": ""
            }"#,
        )
        .unwrap();
        assert!(body.body.is_none());
        assert!(body.is_restricted);
    }
}
