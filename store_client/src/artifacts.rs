use std::path::{Path, PathBuf};

use comms::{
    checksum,
    specs::{FileMetadata, FileType},
};
use log::debug;
use walkdir::WalkDir;

use crate::error::Result;

/// Expands files and directory trees into per-file artifact metadata.
///
/// Directory inputs are walked recursively and every regular file found
/// becomes an independent artifact; plain file inputs are taken as-is. Each
/// entry gets its content digest computed here, so the returned batch is
/// ready for `StoreClient::track_artifacts`.
///
/// # Arguments
/// * `parent_id` - Entity the artifacts belong to.
/// * `inputs` - Files and/or directories to track.
///
/// # Returns
/// One `FileMetadata` per regular file, in walk order.
pub async fn expand_artifacts(parent_id: &str, inputs: &[PathBuf]) -> Result<Vec<FileMetadata>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input) {
                let entry = entry.map_err(std::io::Error::from)?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.clone());
        }
    }

    let mut artifacts = Vec::with_capacity(files.len());
    for path in files {
        artifacts.push(artifact_metadata(parent_id, &path).await?);
    }

    debug!(parent_id = parent_id, count = artifacts.len(); "expanded artifact inputs");
    Ok(artifacts)
}

async fn artifact_metadata(parent_id: &str, path: &Path) -> Result<FileMetadata> {
    let digest = checksum::file_digest(path).await?;

    Ok(FileMetadata {
        parent_id: parent_id.to_string(),
        path: path.display().to_string(),
        checksum: digest,
        file_type: FileType::from_path(path),
    })
}
