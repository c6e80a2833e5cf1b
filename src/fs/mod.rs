//! Filesystem module.
//!
//! Provides:
//! - The archive's directory layout
//! - Media filename generation

pub mod naming;
pub mod paths;

pub use naming::{filename_from_url, media_filename};
pub use paths::{files_dir, images_dir, post_dir, thumbnails_dir};
