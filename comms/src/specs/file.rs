use std::path::Path;

use serde::{Deserialize, Serialize};

/// Coarse content class of a tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Checkpoint,
    Model,
    Text,
    Image,
    Audio,
    Video,
    Unknown,
}

impl FileType {
    /// Infers the file type from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Unknown;
        };

        match ext.to_ascii_lowercase().as_str() {
            "pt" | "pth" | "ckpt" => Self::Checkpoint,
            "onnx" | "pb" | "safetensors" => Self::Model,
            "txt" | "log" | "json" | "yaml" | "csv" => Self::Text,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" => Self::Image,
            "wav" | "mp3" | "flac" | "ogg" => Self::Audio,
            "mp4" | "avi" | "mkv" | "webm" => Self::Video,
            _ => Self::Unknown,
        }
    }
}

/// Describes one file in a chunked stream or a track-artifacts batch.
///
/// `checksum` is the lowercase hex digest of the complete file contents,
/// computed before any chunk is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub parent_id: String,
    pub path: String,
    pub checksum: String,
    pub file_type: FileType,
}
