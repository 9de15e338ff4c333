use std::path::Path;

use super::{Acquisition, SourceError};

/// Image types the file source accepts (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|ok| ok.eq_ignore_ascii_case(e)))
}

/// Validate a user-selected file.  An empty selection means the picker was
/// dismissed and yields [`Acquisition::Cancelled`].
pub fn select_file(path: &Path) -> Result<Acquisition, SourceError> {
    if path.as_os_str().is_empty() {
        return Ok(Acquisition::Cancelled);
    }
    if !is_supported_image(path) {
        return Err(SourceError::Unsupported(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(SourceError::NotFound(path.display().to_string()));
    }
    Ok(Acquisition::Image(path.to_path_buf()))
}
