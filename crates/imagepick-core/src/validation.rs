//! Gallery selection validation
//!
//! Mirrors the MIME restriction a host would hand to its platform picker: an
//! allowlist of image content types, empty meaning "any image".

use std::path::Path;

use crate::error::PickError;

/// MIME-type allowlist for gallery selection
#[derive(Debug, Clone, Default)]
pub struct MimeFilter {
    allowed: Vec<String>,
}

impl MimeFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Validate a selected file against the allowlist using its extension
    pub fn validate(&self, path: &Path) -> Result<(), PickError> {
        let mime = mime_for_path(path);
        if !mime.starts_with("image/") {
            return Err(PickError::InvalidRequest(format!(
                "{} is not an image ({})",
                path.display(),
                mime
            )));
        }
        if self.allowed.is_empty() || self.allowed.iter().any(|m| m == mime) {
            Ok(())
        } else {
            Err(PickError::InvalidRequest(format!(
                "{} has type {} (allowed: {:?})",
                path.display(),
                mime,
                self.allowed
            )))
        }
    }
}

/// Guess a MIME type from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("heic") | Some("heif") => "image/heic",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_accepts_any_image() {
        let filter = MimeFilter::default();
        assert!(filter.validate(Path::new("a.jpg")).is_ok());
        assert!(filter.validate(Path::new("a.webp")).is_ok());
    }

    #[test]
    fn test_empty_filter_rejects_non_image() {
        let filter = MimeFilter::default();
        assert!(filter.validate(Path::new("doc.pdf")).is_err());
        assert!(filter.validate(Path::new("notes.txt")).is_err());
    }

    #[test]
    fn test_allowlist() {
        let filter = MimeFilter::new(["image/png", "image/jpeg"]);
        assert!(filter.validate(Path::new("a.png")).is_ok());
        assert!(filter.validate(Path::new("a.JPG")).is_ok());
        assert!(filter.validate(Path::new("a.gif")).is_err());
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("x.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("x.unknown")), "application/octet-stream");
    }
}
