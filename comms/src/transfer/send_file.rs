use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::{
    Sender,
    msg::FileFrame,
    specs::FileMetadata,
};

/// The chunk size at which files are read and framed.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Streams a file as one metadata frame followed by fixed-size chunk frames.
///
/// The metadata frame always goes out before any data, so the remote side
/// knows the expected checksum up front. A zero-length source produces the
/// metadata frame and nothing else. The caller signals end of stream by
/// closing the sender afterwards.
///
/// # Arguments
/// * `src` - The file contents to stream.
/// * `metadata` - Describes the file; its checksum must already cover the
///   complete contents of `src`.
/// * `chunk` - Frame payload size in bytes.
/// * `sender` - The sending end of the stream.
///
/// # Returns
/// The number of content bytes sent.
pub async fn send_file<R, W>(
    src: &mut R,
    metadata: FileMetadata,
    chunk: usize,
    sender: &mut Sender<W>,
) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    sender.send(&FileFrame::Metadata(metadata)).await?;

    let mut buf = vec![0u8; chunk];
    let mut sent = 0u64;

    loop {
        let read = src.read(&mut buf).await?;
        if read == 0 {
            break;
        }

        sender.send(&FileFrame::Chunk(&buf[..read])).await?;
        sent += read as u64;
    }

    Ok(sent)
}
