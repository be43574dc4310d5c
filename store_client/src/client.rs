use std::path::Path;

use comms::{
    Receiver, Sender, checksum,
    msg::{StoreRequest, StoreResponse},
    specs::{FileMetadata, FileType},
    transfer,
};
use log::{debug, info};
use tokio::{
    fs,
    io::{AsyncRead, AsyncWrite},
};

use crate::error::{Result, StoreErr};

/// Outcome of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub file_id: String,
    pub checksum: String,
    pub bytes: u64,
}

/// Store service client for one streaming operation.
///
/// Each operation owns the underlying connection: uploads half-close it to
/// signal end of stream and downloads consume it until the server closes,
/// so a client is consumed by the call. Callers open a fresh connection per
/// transfer, and retry failed transfers from scratch.
pub struct StoreClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    rx: Receiver<R>,
    tx: Sender<W>,
}

impl<R, W> StoreClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(rx: Receiver<R>, tx: Sender<W>) -> Self {
        Self { rx, tx }
    }

    /// Uploads one file as a chunked stream.
    ///
    /// The whole-file digest is computed before any frame goes out and
    /// travels in the metadata frame, so the server can bind the assigned
    /// file id to it. Mid-stream failures abort the upload; there are no
    /// partial-frame retries.
    ///
    /// # Arguments
    /// * `parent_id` - Entity (experiment, model, checkpoint) owning the file.
    /// * `path` - Local file to upload.
    /// * `file_type` - Content class recorded in the metadata.
    ///
    /// # Returns
    /// The server-assigned file id together with the checksum and byte count.
    pub async fn upload_file(
        mut self,
        parent_id: &str,
        path: &Path,
        file_type: FileType,
    ) -> Result<TransferResult> {
        let local_checksum = checksum::file_digest(path).await?;
        let metadata = FileMetadata {
            parent_id: parent_id.to_string(),
            path: path.display().to_string(),
            checksum: local_checksum.clone(),
            file_type,
        };

        debug!(
            path = metadata.path.as_str(),
            checksum = local_checksum.as_str();
            "starting upload"
        );

        let mut src = fs::File::open(path).await?;
        let bytes = transfer::send_file(
            &mut src,
            metadata,
            transfer::DEFAULT_CHUNK_SIZE,
            &mut self.tx,
        )
        .await?;
        self.tx.finish().await?;

        match self.rx.recv::<StoreResponse>().await? {
            StoreResponse::FileUploaded { file_id, checksum } => {
                if !checksum.is_empty() && checksum != local_checksum {
                    return Err(StoreErr::ChecksumMismatch {
                        expected: local_checksum,
                        got: checksum,
                    });
                }

                info!(file_id = file_id.as_str(), bytes = bytes; "upload complete");
                Ok(TransferResult {
                    file_id,
                    checksum: local_checksum,
                    bytes,
                })
            }
            StoreResponse::Err { detail } => Err(StoreErr::Rejected(detail)),
            other => Err(unexpected(&other)),
        }
    }

    /// Downloads a file by id, writing it to `dest`.
    ///
    /// Parent directories are created as needed. The stream's metadata
    /// frame may arrive before or between chunks; once the stream ends the
    /// digest recomputed over the received bytes is compared against the
    /// metadata checksum when one was provided. There is no
    /// resume-from-offset: any stream error aborts the whole download.
    ///
    /// # Arguments
    /// * `file_id` - Store-assigned identifier of the file.
    /// * `dest` - Local destination path.
    ///
    /// # Returns
    /// The checksum and byte count of the downloaded content.
    pub async fn download_file(mut self, file_id: &str, dest: &Path) -> Result<TransferResult> {
        self.tx
            .send(&StoreRequest::DownloadFile {
                file_id: file_id.to_string(),
            })
            .await?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut dst = fs::File::create(dest).await?;
        let received = transfer::recv_file(&mut dst, &mut self.rx).await?;

        if let Some(metadata) = &received.metadata {
            if !metadata.checksum.is_empty() && metadata.checksum != received.checksum {
                return Err(StoreErr::ChecksumMismatch {
                    expected: metadata.checksum.clone(),
                    got: received.checksum,
                });
            }
        }

        info!(
            file_id = file_id,
            bytes = received.bytes;
            "download complete"
        );
        Ok(TransferResult {
            file_id: file_id.to_string(),
            checksum: received.checksum,
            bytes: received.bytes,
        })
    }

    /// Registers a batch of already-stored artifacts by metadata only; no
    /// content bytes are moved.
    ///
    /// # Arguments
    /// * `files` - One entry per artifact, e.g. from `expand_artifacts`.
    ///
    /// # Returns
    /// The number of files the store recorded.
    pub async fn track_artifacts(mut self, files: Vec<FileMetadata>) -> Result<u64> {
        let count = files.len();
        self.tx
            .send(&StoreRequest::TrackArtifacts { files })
            .await?;

        match self.rx.recv::<StoreResponse>().await? {
            StoreResponse::ArtifactsTracked { num_files_tracked } => {
                info!(sent = count, tracked = num_files_tracked; "artifacts tracked");
                Ok(num_files_tracked)
            }
            StoreResponse::Err { detail } => Err(StoreErr::Rejected(detail)),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &StoreResponse) -> StoreErr {
    let got = match response {
        StoreResponse::FileUploaded { .. } => "file_uploaded",
        StoreResponse::ArtifactsTracked { .. } => "artifacts_tracked",
        StoreResponse::Err { .. } => "err",
    };

    StoreErr::UnexpectedMessage { got }
}
