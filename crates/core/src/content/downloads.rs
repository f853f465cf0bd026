//! Download center entries.

use serde::{Deserialize, Serialize};
use std::fmt;

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;

/// Coarse file type used to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
    Video,
    Archive,
    Document,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("pdf") {
            FileKind::Pdf
        } else if mime.contains("image") {
            FileKind::Image
        } else if mime.contains("video") {
            FileKind::Video
        } else if ["zip", "rar", "tar", "7z"]
            .iter()
            .any(|needle| mime.contains(needle))
        {
            FileKind::Archive
        } else {
            FileKind::Document
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Archive => "archive",
            FileKind::Document => "document",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloadable document with its file resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub version: Option<String>,
    pub published_date: Option<String>,
    pub file: Option<DownloadFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadFile {
    pub url: String,
    pub size: String,
    pub kind: FileKind,
}

/// `"N B"` below 1 KiB, otherwise KB or MB with one decimal.
pub fn format_file_size(bytes: f64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.1} MB", bytes / MIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0.0), "0 B");
        assert_eq!(format_file_size(1023.0), "1023 B");
        assert_eq!(format_file_size(1024.0), "1.0 KB");
        assert_eq!(format_file_size(1536.0), "1.5 KB");
        assert_eq!(format_file_size(MIB - 1.0), "1024.0 KB");
        assert_eq!(format_file_size(MIB), "1.0 MB");
        assert_eq!(format_file_size(5_557_452.0), "5.3 MB");
    }

    #[test]
    fn test_file_kind_from_mime() {
        assert_eq!(FileKind::from_mime("application/pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_mime("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_mime("video/mp4"), FileKind::Video);
        assert_eq!(FileKind::from_mime("application/zip"), FileKind::Archive);
        assert_eq!(FileKind::from_mime("application/x-7z-compressed"), FileKind::Archive);
        assert_eq!(FileKind::from_mime("application/vnd.rar"), FileKind::Archive);
        assert_eq!(FileKind::from_mime("application/msword"), FileKind::Document);
        assert_eq!(FileKind::from_mime("application/octet-stream"), FileKind::Document);
    }

    #[test]
    fn test_file_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FileKind::Archive).ok().as_deref(),
            Some("\"archive\"")
        );
        assert_eq!(FileKind::Pdf.to_string(), "pdf");
    }
}
