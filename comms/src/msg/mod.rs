//! Application layer messages for the admin and store surfaces.

use std::io;

mod admin;
mod store;

pub use admin::{AdminRequest, AdminResponse};
pub use store::{FileFrame, StoreRequest, StoreResponse};

type Kind = u32;
const KIND_SIZE: usize = size_of::<Kind>();

const ADMIN_REQUEST: Kind = 1;
const ADMIN_RESPONSE: Kind = 2;
const STORE_REQUEST: Kind = 3;
const STORE_RESPONSE: Kind = 4;
const FILE_METADATA: Kind = 5;
const FILE_CHUNK: Kind = 6;

fn put_kind(buf: &mut Vec<u8>, kind: Kind) {
    buf.extend_from_slice(&kind.to_be_bytes());
}

fn split_kind(buf: &[u8]) -> io::Result<(Kind, &[u8])> {
    if buf.len() < KIND_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "the received frame is too small {}, must at least be {KIND_SIZE} bytes",
                buf.len()
            ),
        ));
    }

    let (kind_buf, rest) = buf.split_at(KIND_SIZE);

    // SAFETY: we splitted the buffer to be of size `KIND_SIZE` just above.
    let kind = Kind::from_be_bytes(kind_buf.try_into().unwrap());

    Ok((kind, rest))
}

fn invalid_kind<T>(kind: Kind) -> io::Result<T> {
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("received an invalid kind header {kind}"),
    ))
}
