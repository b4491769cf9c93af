//! Uploaded course material attached to a job

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declared kind of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Image,
    #[serde(rename = "pdf")]
    Document,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Image => "image",
            SourceKind::Document => "pdf",
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(SourceKind::Text),
            "image" | "img" => Ok(SourceKind::Image),
            "pdf" | "document" => Ok(SourceKind::Document),
            other => Err(format!("unknown source kind: {}", other)),
        }
    }
}

/// Decoded upload content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceContent {
    /// UTF-8 text ready for segmentation
    Decoded { text: String },
    /// Binary upload awaiting OCR / document decoding
    PendingBinary { kind: SourceKind, byte_len: usize },
}

impl SourceContent {
    /// Decode raw upload bytes; anything that is not valid UTF-8 stays pending
    pub fn from_bytes(kind: SourceKind, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => SourceContent::Decoded { text },
            Err(e) => SourceContent::PendingBinary {
                kind,
                byte_len: e.as_bytes().len(),
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SourceContent::Decoded { text } => Some(text),
            SourceContent::PendingBinary { .. } => None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, SourceContent::Decoded { .. })
    }
}

/// Source record; immutable once attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub source_id: Uuid,
    pub kind: SourceKind,
    pub filename: String,
    pub content: SourceContent,
    pub attached_at: DateTime<Utc>,
}

impl Source {
    pub fn new(kind: SourceKind, filename: impl Into<String>, content: SourceContent) -> Self {
        Self {
            source_id: Uuid::new_v4(),
            kind,
            filename: filename.into(),
            content,
            attached_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bytes_decode() {
        let content = SourceContent::from_bytes(SourceKind::Text, b"# Heading\nbody".to_vec());
        assert_eq!(content.text(), Some("# Heading\nbody"));
    }

    #[test]
    fn test_invalid_utf8_stays_pending() {
        let content = SourceContent::from_bytes(SourceKind::Image, vec![0xff, 0xd8, 0xff, 0xe0]);
        assert_eq!(
            content,
            SourceContent::PendingBinary {
                kind: SourceKind::Image,
                byte_len: 4
            }
        );
        assert!(content.text().is_none());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("PDF".parse::<SourceKind>().unwrap(), SourceKind::Document);
        assert_eq!("text".parse::<SourceKind>().unwrap(), SourceKind::Text);
        assert!("audio".parse::<SourceKind>().is_err());
    }
}
