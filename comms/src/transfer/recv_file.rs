use std::io;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::{
    Receiver,
    checksum::StreamDigest,
    msg::FileFrame,
    specs::FileMetadata,
};

/// Outcome of consuming one chunked file stream.
#[derive(Debug)]
pub struct RecvFile {
    /// The metadata frame, wherever it appeared in the stream.
    pub metadata: Option<FileMetadata>,
    /// Content bytes written to the destination.
    pub bytes: u64,
    /// Digest recomputed over the bytes actually received.
    pub checksum: String,
}

/// Consumes a chunked file stream until the remote side closes it, writing
/// chunk payloads sequentially to `dst`.
///
/// The metadata frame may arrive before, between or after chunk frames;
/// the last one seen wins. The digest of the received bytes is computed on
/// the fly so callers can compare it against the metadata checksum.
///
/// # Arguments
/// * `dst` - Destination for the file contents.
/// * `receiver` - The receiving end of the stream.
///
/// # Returns
/// A `RecvFile` describing what was received.
pub async fn recv_file<W, R>(dst: &mut W, receiver: &mut Receiver<R>) -> io::Result<RecvFile>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    let mut digest = StreamDigest::new();
    let mut metadata = None;
    let mut bytes = 0u64;

    loop {
        match receiver.recv_eof::<FileFrame>().await? {
            None => break,
            Some(FileFrame::Metadata(meta)) => metadata = Some(meta),
            Some(FileFrame::Chunk(chunk)) => {
                digest.update(chunk);
                dst.write_all(chunk).await?;
                bytes += chunk.len() as u64;
            }
        }
    }

    dst.flush().await?;

    Ok(RecvFile {
        metadata,
        bytes,
        checksum: digest.finish(),
    })
}
