//! Attached file handling
//!
//! Files attached to a submission are validated client-side (count and size
//! caps), loaded into memory, and described for the completion prompt: text
//! extraction for text-like files, a metadata description for images, and a
//! type/name description for everything else. The persisted form keeps only
//! a lightweight preview for images and drops raw content for other files,
//! since the snapshot store has small capacity.

use crate::config::AttachmentConfig;
use crate::error::{JujuError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions treated as text-like in addition to `text/*` MIME types
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "json", "yaml", "yml", "toml", "xml", "html", "css", "js", "ts", "rs",
    "py", "rb", "go", "java", "c", "h", "cpp", "sh", "sql", "log",
];

/// A file attached to a user submission
///
/// `data` holds the raw bytes while the submission is in flight; the
/// persisted form produced by [`AttachedFile::persistable`] strips it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedFile {
    /// File name (no directory components)
    pub name: String,
    /// Guessed MIME type
    pub mime_type: String,
    /// Raw content; `None` once stripped for persistence
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Vec<u8>>,
    /// Base64 data URL preview, kept for images when persisted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preview: Option<String>,
    /// Extracted text content for text-like files
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_content: Option<String>,
    /// Generated description for images
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl AttachedFile {
    /// Load an attachment from disk
    ///
    /// Reads the file, guesses its MIME type from the extension, extracts
    /// text for text-like files, and generates a metadata description for
    /// images. The size cap must be checked by the caller via
    /// [`validate_attachments`] before reading; this function enforces it
    /// again as a backstop.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `limits` - Attachment limits from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or exceeds the size cap
    pub fn load<P: AsRef<Path>>(path: P, limits: &AttachmentConfig) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| JujuError::Attachment(format!("Not a file: {}", path.display())))?;

        let metadata = std::fs::metadata(path)
            .map_err(|e| JujuError::Attachment(format!("Cannot read {}: {}", name, e)))?;
        if metadata.len() > limits.max_file_bytes {
            return Err(JujuError::Attachment(format!(
                "{} is {} bytes, exceeding the {} byte limit",
                name,
                metadata.len(),
                limits.max_file_bytes
            ))
            .into());
        }

        let data = std::fs::read(path)
            .map_err(|e| JujuError::Attachment(format!("Cannot read {}: {}", name, e)))?;
        let mime_type = guess_mime_type(&name);

        let mut file = Self {
            name,
            mime_type,
            data: Some(data),
            preview: None,
            text_content: None,
            description: None,
        };

        if file.is_text_like() {
            file.text_content = file
                .data
                .as_deref()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        } else if file.is_image() {
            file.description = Some(file.describe_image());
        }

        tracing::debug!(
            "Loaded attachment {} ({}, {} bytes)",
            file.name,
            file.mime_type,
            file.data.as_deref().map(|d| d.len()).unwrap_or(0)
        );

        Ok(file)
    }

    /// Whether this file is treated as text-like
    pub fn is_text_like(&self) -> bool {
        if self.mime_type.starts_with("text/") {
            return true;
        }
        extension_of(&self.name)
            .map(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Whether this file is an image
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Generate a metadata description for an image attachment
    ///
    /// Decodes just enough of the image to report format and dimensions;
    /// undecodable data degrades to a type/name description.
    fn describe_image(&self) -> String {
        let bytes = match self.data.as_deref() {
            Some(bytes) => bytes,
            None => return format!("{} ({})", self.name, self.mime_type),
        };

        match image::load_from_memory(bytes) {
            Ok(img) => format!(
                "{}: {} image, {}x{} pixels, {} bytes",
                self.name,
                self.mime_type,
                img.width(),
                img.height(),
                bytes.len()
            ),
            Err(_) => format!("{} ({}, {} bytes)", self.name, self.mime_type, bytes.len()),
        }
    }

    /// Inline representation for the prompt appendix
    ///
    /// Text-like files contribute their extracted text, images their
    /// generated description, everything else a type/name line.
    pub fn prompt_fragment(&self) -> String {
        if let Some(text) = &self.text_content {
            format!("File: {} ({})\n{}", self.name, self.mime_type, text)
        } else if let Some(description) = &self.description {
            format!("Image: {}", description)
        } else {
            format!("File: {} ({}), content not included", self.name, self.mime_type)
        }
    }

    /// The stripped form written to the snapshot store
    ///
    /// Images keep a base64 data URL preview; all other raw content is
    /// dropped. Extracted text and descriptions are retained either way.
    pub fn persistable(&self) -> Self {
        let preview = if self.is_image() {
            self.data.as_deref().map(|bytes| {
                format!(
                    "data:{};base64,{}",
                    self.mime_type,
                    base64::engine::general_purpose::STANDARD.encode(bytes)
                )
            })
        } else {
            None
        };

        Self {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            data: None,
            preview: preview.or_else(|| self.preview.clone()),
            text_content: self.text_content.clone(),
            description: self.description.clone(),
        }
    }
}

/// Validate a batch of attachment paths against the configured limits
///
/// Checks the file count and per-file size caps before any content is read
/// or any network call is made.
///
/// # Errors
///
/// Returns error when more than `max_files` paths are given or any file
/// exceeds `max_file_bytes`
pub fn validate_attachments<P: AsRef<Path>>(paths: &[P], limits: &AttachmentConfig) -> Result<()> {
    if paths.len() > limits.max_files {
        return Err(JujuError::Attachment(format!(
            "Too many files: {} attached, at most {} allowed",
            paths.len(),
            limits.max_files
        ))
        .into());
    }

    for path in paths {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| {
            JujuError::Attachment(format!("Cannot read {}: {}", path.display(), e))
        })?;
        if metadata.len() > limits.max_file_bytes {
            return Err(JujuError::Attachment(format!(
                "{} is {} bytes, exceeding the {} byte limit",
                path.display(),
                metadata.len(),
                limits.max_file_bytes
            ))
            .into());
        }
    }

    Ok(())
}

/// Guess a MIME type from a file name's extension
fn guess_mime_type(name: &str) -> String {
    let ext = extension_of(name).unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" | "log" => "text/plain",
        "csv" => "text/csv",
        "html" => "text/html",
        "css" => "text/css",
        "json" => "application/json",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Lowercased extension of a file name, if any
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn limits() -> AttachmentConfig {
        AttachmentConfig::default()
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("notes.txt"), "text/plain");
        assert_eq!(guess_mime_type("photo.PNG"), "image/png");
        assert_eq!(guess_mime_type("data.json"), "application/json");
        assert_eq!(guess_mime_type("mystery.bin"), "application/octet-stream");
        assert_eq!(guess_mime_type("no_extension"), "application/octet-stream");
    }

    #[test]
    fn test_load_text_file_extracts_content() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "hello.txt", b"hello world");

        let file = AttachedFile::load(&path, &limits()).unwrap();
        assert_eq!(file.name, "hello.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert!(file.is_text_like());
        assert_eq!(file.text_content.as_deref(), Some("hello world"));
        assert!(file.description.is_none());
    }

    #[test]
    fn test_load_code_file_is_text_like() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "main.rs", b"fn main() {}");

        let file = AttachedFile::load(&path, &limits()).unwrap();
        assert!(file.is_text_like());
        assert_eq!(file.text_content.as_deref(), Some("fn main() {}"));
    }

    #[test]
    fn test_load_binary_file_has_no_text() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "blob.bin", &[0u8, 1, 2, 3]);

        let file = AttachedFile::load(&path, &limits()).unwrap();
        assert!(!file.is_text_like());
        assert!(file.text_content.is_none());
        assert!(file.prompt_fragment().contains("content not included"));
    }

    #[test]
    fn test_load_undecodable_image_degrades_to_name_description() {
        let dir = tempdir().unwrap();
        // .png extension but not a real image
        let path = write_file(&dir, "fake.png", b"not an image");

        let file = AttachedFile::load(&path, &limits()).unwrap();
        assert!(file.is_image());
        let description = file.description.as_deref().unwrap();
        assert!(description.contains("fake.png"));
        assert!(description.contains("image/png"));
    }

    #[test]
    fn test_load_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "big.txt", &vec![b'x'; 32]);
        let limits = AttachmentConfig {
            max_file_bytes: 16,
            ..Default::default()
        };

        assert!(AttachedFile::load(&path, &limits).is_err());
    }

    #[test]
    fn test_validate_rejects_too_many_files() {
        let dir = tempdir().unwrap();
        let paths: Vec<_> = (0..6)
            .map(|i| write_file(&dir, &format!("f{}.txt", i), b"x"))
            .collect();

        let result = validate_attachments(&paths, &limits());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Too many files"));
    }

    #[test]
    fn test_validate_accepts_exactly_max_files() {
        let dir = tempdir().unwrap();
        let paths: Vec<_> = (0..5)
            .map(|i| write_file(&dir, &format!("f{}.txt", i), b"x"))
            .collect();

        assert!(validate_attachments(&paths, &limits()).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "big.txt", &vec![b'x'; 100]);
        let limits = AttachmentConfig {
            max_file_bytes: 50,
            ..Default::default()
        };

        assert!(validate_attachments(&[path], &limits).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_file() {
        let missing = std::path::PathBuf::from("definitely/not/here.txt");
        assert!(validate_attachments(&[missing], &limits()).is_err());
    }

    #[test]
    fn test_persistable_strips_non_image_data() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", b"keep the text");

        let file = AttachedFile::load(&path, &limits()).unwrap();
        let stripped = file.persistable();
        assert!(stripped.data.is_none());
        assert!(stripped.preview.is_none());
        assert_eq!(stripped.text_content.as_deref(), Some("keep the text"));
    }

    #[test]
    fn test_persistable_keeps_image_preview() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "tiny.png", &[1u8, 2, 3]);

        let file = AttachedFile::load(&path, &limits()).unwrap();
        let stripped = file.persistable();
        assert!(stripped.data.is_none());
        let preview = stripped.preview.unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_prompt_fragment_for_text_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "notes.md", b"# Title");

        let file = AttachedFile::load(&path, &limits()).unwrap();
        let fragment = file.prompt_fragment();
        assert!(fragment.contains("notes.md"));
        assert!(fragment.contains("# Title"));
    }
}
