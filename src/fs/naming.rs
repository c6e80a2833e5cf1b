//! Filename generation for downloaded media.

/// Filename for a structured media item: `{mediaId}.{extension}`.
pub fn media_filename(media_id: &str, extension: &str) -> String {
    format!("{}.{}", media_id, extension)
}

/// Derive a filename from a URL's last path segment, dropping any query
/// string. Used for legacy posts, whose media carry no ids.
pub fn filename_from_url(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    if name.is_empty() {
        "unnamed".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_filename() {
        assert_eq!(media_filename("abc123", "png"), "abc123.png");
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/path/file.jpg"),
            "file.jpg"
        );
        assert_eq!(
            filename_from_url("https://example.com/path/file.jpg?token=abc"),
            "file.jpg"
        );
    }

    #[test]
    fn test_filename_from_url_trailing_slash() {
        assert_eq!(filename_from_url("https://example.com/dir/"), "unnamed");
    }
}
