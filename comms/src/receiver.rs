//! The implementation of the receiving end of the application layer protocol.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Deserialize, LEN_TYPE_SIZE, LenType};

/// The receiving end handle of the communication.
pub struct Receiver<R: AsyncRead + Unpin> {
    rx: R,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> Receiver<R> {
    /// Creates a new `Receiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    pub(super) fn new(rx: R) -> Self {
        Self {
            rx,
            buf: Vec::new(),
        }
    }

    /// Waits to receive a new message from the inner receiver.
    ///
    /// The returned `T`'s lifetime is tied to the receiver's internal buffer,
    /// so it must be consumed before the next `recv` call.
    ///
    /// # Returns
    /// A result object that returns `T` on success or `io::Error` on failure.
    /// A closed stream yields `ErrorKind::UnexpectedEof`.
    pub async fn recv<'a, T: Deserialize<'a>>(&'a mut self) -> io::Result<T> {
        let Some(len) = self.read_len().await? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream closed while waiting for a message",
            ));
        };

        self.fill(len).await?;
        T::deserialize(&self.buf[..len])
    }

    /// Like `recv`, but treats a clean end of stream at a frame boundary as
    /// `None`. An end of stream in the middle of a frame is still an error.
    ///
    /// Used by stream consumers (e.g. file downloads) where the remote side
    /// signals completion by closing its write half.
    pub async fn recv_eof<'a, T: Deserialize<'a>>(&'a mut self) -> io::Result<Option<T>> {
        let Some(len) = self.read_len().await? else {
            return Ok(None);
        };

        self.fill(len).await?;
        T::deserialize(&self.buf[..len]).map(Some)
    }

    /// Reads the length prefix. Returns `None` on a clean end of stream.
    async fn read_len(&mut self) -> io::Result<Option<usize>> {
        let mut len_buf = [0; LEN_TYPE_SIZE];
        let mut filled = 0;

        while filled < LEN_TYPE_SIZE {
            let read = self.rx.read(&mut len_buf[filled..]).await?;
            if read == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream closed in the middle of a length prefix",
                ));
            }
            filled += read;
        }

        Ok(Some(LenType::from_be_bytes(len_buf) as usize))
    }

    async fn fill(&mut self, len: usize) -> io::Result<()> {
        if self.buf.len() < len {
            self.buf.resize(len, 0);
        }
        self.rx.read_exact(&mut self.buf[..len]).await?;
        Ok(())
    }
}
