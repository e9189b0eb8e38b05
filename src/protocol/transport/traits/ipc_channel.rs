//! Minimal abstraction for an asynchronous mailbox channel. Allows the library
//! to plug into various implementations (character device, simulator, etc.).
use futures_util::Future;

/// Contract to exchange raw bytes with the peer core.
pub trait IpcChannel {
    type Error: core::fmt::Debug;
    /// Read whatever the peer has pushed, at most `buffer.len()` bytes.
    /// `Ok(0)` means nothing was available.
    fn read<'a>(
        &'a mut self,
        buffer: &'a mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + 'a;
    /// Hand `bytes` to the peer and return how many were accepted.
    fn write<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + 'a;
}
