use std::io;

use crate::{Deserialize, Serialize, specs::FileMetadata};

use super::{FILE_CHUNK, FILE_METADATA, STORE_REQUEST, STORE_RESPONSE, invalid_kind, put_kind, split_kind};

/// A non-streaming request sent by a client to the store service.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreRequest {
    DownloadFile { file_id: String },
    TrackArtifacts { files: Vec<FileMetadata> },
}

/// The store service's reply at the end of an operation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreResponse {
    FileUploaded { file_id: String, checksum: String },
    ArtifactsTracked { num_files_tracked: u64 },
    Err { detail: String },
}

/// One frame of a chunked file stream, in either direction.
///
/// A stream carries exactly one metadata frame and zero or more chunk
/// frames; on upload the metadata frame always comes first, on download it
/// may interleave with chunks. The stream ends when the sending side closes
/// its write half.
#[derive(Debug)]
pub enum FileFrame<'a> {
    Metadata(FileMetadata),
    Chunk(&'a [u8]),
}

impl<'a> Serialize<'a> for StoreRequest {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        put_kind(buf, STORE_REQUEST);

        // SAFETY: Serialize impl for `StoreRequest` is derived and not
        //         implemented by hand. Nor has a non string-key map inside.
        serde_json::to_writer(buf, self).unwrap();
        None
    }
}

impl<'a> Deserialize<'a> for StoreRequest {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let (kind, rest) = split_kind(buf)?;
        match kind {
            STORE_REQUEST => Ok(serde_json::from_slice(rest)?),
            other => invalid_kind(other),
        }
    }
}

impl<'a> Serialize<'a> for StoreResponse {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        put_kind(buf, STORE_RESPONSE);

        // SAFETY: see the `StoreRequest` impl.
        serde_json::to_writer(buf, self).unwrap();
        None
    }
}

impl<'a> Deserialize<'a> for StoreResponse {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let (kind, rest) = split_kind(buf)?;
        match kind {
            STORE_RESPONSE => Ok(serde_json::from_slice(rest)?),
            other => invalid_kind(other),
        }
    }
}

impl<'a> Serialize<'a> for FileFrame<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]> {
        match self {
            FileFrame::Metadata(meta) => {
                put_kind(buf, FILE_METADATA);

                // SAFETY: see the `StoreRequest` impl.
                serde_json::to_writer(buf, meta).unwrap();
                None
            }
            FileFrame::Chunk(bytes) => {
                put_kind(buf, FILE_CHUNK);
                Some(bytes)
            }
        }
    }
}

impl<'a> Deserialize<'a> for FileFrame<'a> {
    fn deserialize(buf: &'a [u8]) -> io::Result<Self> {
        let (kind, rest) = split_kind(buf)?;
        match kind {
            FILE_METADATA => Ok(FileFrame::Metadata(serde_json::from_slice(rest)?)),
            FILE_CHUNK => Ok(FileFrame::Chunk(rest)),
            other => invalid_kind(other),
        }
    }
}
