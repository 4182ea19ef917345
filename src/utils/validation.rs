use crate::config::AppConfig;
use thiserror::Error;

/// Longest filename kept for display, in bytes
const MAX_FILENAME_LEN: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed: '.{extension}'. Allowed types: {allowed}")]
    UnsupportedType { extension: String, allowed: String },

    #[error("File type not allowed: no file extension. Allowed types: {allowed}")]
    MissingExtension { allowed: String },
}

/// A client filename that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFilename {
    /// Display name, stripped of any path components
    pub name: String,
    /// Lower-cased extension, guaranteed to be in the allow-set
    pub extension: String,
}

/// Sanitizes filename to prevent path traversal and markup injection.
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    // Browsers on Windows may send the full client path
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return None;
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path components stripped from uploaded filename: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Limit length safely for UTF-8
    if sanitized.len() > MAX_FILENAME_LEN {
        let mut end = MAX_FILENAME_LEN;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        return Some(sanitized[..end].to_string());
    }

    Some(sanitized)
}

/// Lower-cased text after the last dot of `filename`, if any. A bare
/// `.xlsx` counts as an `xlsx` file.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

/// Checks the client filename against the configured allow-set
pub fn validate_filename(
    filename: &str,
    config: &AppConfig,
) -> Result<ValidatedFilename, ValidationError> {
    let name = sanitize_filename(filename).ok_or(ValidationError::EmptyFilename)?;
    let allowed = config.allowed_extensions.join(", ");

    match file_extension(&name) {
        Some(extension) if config.is_extension_allowed(&extension) => {
            Ok(ValidatedFilename { name, extension })
        }
        Some(extension) => Err(ValidationError::UnsupportedType { extension, allowed }),
        None => Err(ValidationError::MissingExtension { allowed }),
    }
}
