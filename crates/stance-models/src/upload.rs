//! Upload name validation.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Video container formats accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoExtension {
    Mp4,
    Mov,
}

impl VideoExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoExtension::Mp4 => "mp4",
            VideoExtension::Mov => "mov",
        }
    }

    /// Extension of a declared file name, if it is an accepted one.
    pub fn from_filename(name: &str) -> Result<Self, UploadError> {
        if name.trim().is_empty() {
            return Err(UploadError::MissingFilename);
        }
        name.rsplit_once('.')
            .and_then(|(_, ext)| ext.parse().ok())
            .ok_or_else(|| UploadError::UnsupportedExtension(name.to_string()))
    }
}

impl fmt::Display for VideoExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoExtension {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp4" => Ok(VideoExtension::Mp4),
            "mov" => Ok(VideoExtension::Mov),
            _ => Err(UploadError::UnsupportedExtension(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Only MP4 or MOV files are supported (got {0})")]
    UnsupportedExtension(String),

    #[error("Uploaded file has no name")]
    MissingFilename,
}

/// Final path component of a declared name, accepting both separator styles.
pub fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = basename(name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_extensions_case_insensitive() {
        assert_eq!(VideoExtension::from_filename("dance.mp4"), Ok(VideoExtension::Mp4));
        assert_eq!(VideoExtension::from_filename("DANCE.MOV"), Ok(VideoExtension::Mov));
        assert_eq!(VideoExtension::from_filename("a.b.Mp4"), Ok(VideoExtension::Mp4));
    }

    #[test]
    fn test_rejected_extensions() {
        assert!(matches!(
            VideoExtension::from_filename("clip.avi"),
            Err(UploadError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            VideoExtension::from_filename("mp4"),
            Err(UploadError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            VideoExtension::from_filename("clip.mp4.txt"),
            Err(UploadError::UnsupportedExtension(_))
        ));
        assert_eq!(VideoExtension::from_filename("  "), Err(UploadError::MissingFilename));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("uploads/abc/dance.mp4"), "dance.mp4");
        assert_eq!(basename("C:\\videos\\dance.mov"), "dance.mov");
        assert_eq!(basename("dance.mp4"), "dance.mp4");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd.mp4"), "passwd.mp4");
        assert_eq!(sanitize_filename("my dance (1).mov"), "my_dance__1_.mov");
        assert_eq!(sanitize_filename(".hidden.mp4"), "hidden.mp4");
        assert_eq!(sanitize_filename("..."), "upload");
    }
}
