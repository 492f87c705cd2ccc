//! Path utilities for detecting image files by extension.
//!
//! Used when listing the example directory so that stray files (READMEs,
//! `.DS_Store`) are not fed to the decoder.

use std::path::Path;

/// List of supported image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Check if a path has an image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use imagestore_common::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("sample.png")));
/// assert!(is_image_file(Path::new("/path/to/photo.JPG")));
/// assert!(!is_image_file(Path::new("notes.txt")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
