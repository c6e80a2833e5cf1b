//! Archive directory layout.
//!
//! The layout is deterministic from creator id and post id:
//! `{downloadDir}/{creatorId}/posts/{postId}/{images,thumbnails,files}/`.

use std::path::{Path, PathBuf};

/// Directory holding everything belonging to one post.
pub fn post_dir(download_dir: &Path, creator_id: &str, post_id: &str) -> PathBuf {
    download_dir.join(creator_id).join("posts").join(post_id)
}

/// Subdirectory for full-size images.
pub fn images_dir(post_dir: &Path) -> PathBuf {
    post_dir.join("images")
}

/// Subdirectory for image thumbnails.
pub fn thumbnails_dir(post_dir: &Path) -> PathBuf {
    post_dir.join("thumbnails")
}

/// Subdirectory for file attachments.
pub fn files_dir(post_dir: &Path) -> PathBuf {
    post_dir.join("files")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_dir_layout() {
        let dir = post_dir(Path::new("/archive"), "creator1", "12345");
        assert_eq!(dir, PathBuf::from("/archive/creator1/posts/12345"));
    }

    #[test]
    fn test_media_subdirs() {
        let post = post_dir(Path::new("/archive"), "c", "p");
        assert_eq!(images_dir(&post), PathBuf::from("/archive/c/posts/p/images"));
        assert_eq!(
            thumbnails_dir(&post),
            PathBuf::from("/archive/c/posts/p/thumbnails")
        );
        assert_eq!(files_dir(&post), PathBuf::from("/archive/c/posts/p/files"));
    }
}
