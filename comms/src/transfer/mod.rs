//! Chunked file streaming primitives used by the store surface.

mod recv_file;
mod send_file;

pub use recv_file::{RecvFile, recv_file};
pub use send_file::{DEFAULT_CHUNK_SIZE, send_file};
