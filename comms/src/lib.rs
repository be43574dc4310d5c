mod deserialize;
mod receiver;
mod sender;
mod serialize;

pub mod checksum;
pub mod msg;
pub mod specs;
pub mod transfer;

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::{AsyncRead, AsyncWrite};

pub use deserialize::Deserialize;
pub use receiver::Receiver;
pub use sender::Sender;
pub use serialize::Serialize;

type LenType = u64;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// Creates both `Receiver` and `Sender` network channel parts.
///
/// Given a writer and reader creates and returns both ends of the communication.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// A communication stream in the form of a receiver and sender.
pub fn channel<R, W>(rx: R, tx: W) -> (Receiver<R>, Sender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (Receiver::new(rx), Sender::new(tx))
}

/// Milliseconds since the unix epoch, used for wire timestamps.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
