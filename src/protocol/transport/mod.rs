//! Mailbox transport: channel identification, transmit message building and
//! the async seams an external byte channel plugs into.
//!
//! ## Link constants
//!
//! The crate never opens a channel itself; these values are recommendations
//! for the code that does.

pub mod mailbox_channel;
pub mod traits;
pub mod tx_can_frame;

/// Size of a single channel read. One read may return several packets or a
/// partial one.
pub const MAX_READ_SIZE: usize = 512;

/// Scratch space large enough for any transmit packet: 5-byte CAN header,
/// 64 FD data bytes and the 11-byte envelope.
pub const MAX_TX_PACKET_SIZE: usize = 80;

/// Recommended timeout for a single channel write (ms).
///
/// [`IpcChannel`](traits::ipc_channel::IpcChannel) implementations **SHOULD**
/// bound `write()` so a stalled peer cannot block the caller forever.
///
/// # Example
///
/// ```rust,ignore
/// use tokio::time::{timeout, Duration};
/// use axon_ipc::protocol::transport::CHANNEL_WRITE_TIMEOUT_MS;
///
/// async fn write(&mut self, bytes: &[u8]) -> Result<usize, Error> {
///     timeout(
///         Duration::from_millis(CHANNEL_WRITE_TIMEOUT_MS as u64),
///         self.file.write(bytes),
///     )
///     .await
///     .map_err(|_| Error::Timeout)?
/// }
/// ```
pub const CHANNEL_WRITE_TIMEOUT_MS: u32 = 100;
