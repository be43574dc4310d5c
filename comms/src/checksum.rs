//! Content digest helpers shared by the transfer engine and its callers.

use std::{io, path::Path};

use sha2::{Digest, Sha256};
use tokio::{fs, io::AsyncReadExt};

const READ_BUF_SIZE: usize = 8192;

/// Computes the lowercase hex SHA-256 digest of a byte slice.
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Computes the lowercase hex SHA-256 digest of a file's full contents.
///
/// Reads the file sequentially so arbitrarily large files never need to fit
/// in memory.
///
/// # Arguments
/// * `path` - The file to digest.
///
/// # Returns
/// The hex digest, or `io::Error` if the file cannot be read.
pub async fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Incremental digest over chunks observed by a stream consumer.
#[derive(Default)]
pub struct StreamDigest {
    hasher: Sha256,
}

impl StreamDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_known_vector() {
        assert_eq!(
            digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn stream_digest_matches_whole_slice() {
        let data = b"the quick brown fox jumps over the lazy dog";

        let mut stream = StreamDigest::new();
        for chunk in data.chunks(7) {
            stream.update(chunk);
        }

        assert_eq!(stream.finish(), digest(data));
    }
}
