//! `IpcChannel` extension providing packet-level helpers: it wraps payloads in
//! envelopes before writing them and decodes bus frames out of what it reads.
//!
//! Every call is a single channel operation. Retries, flow control and
//! reassembly of packets split across reads belong to the caller.
use crate::{
    error::LinkError,
    infra::codec::traits::FromPayload,
    protocol::frame::Frame,
    protocol::packet::{make_packet, parse_packet},
    protocol::transport::traits::ipc_channel::IpcChannel,
    protocol::transport::tx_can_frame::TxCanFrame,
};

/// Trait extending `IpcChannel` with envelope-aware send and receive.
pub trait FrameLink: IpcChannel
where
    <Self as IpcChannel>::Error: core::fmt::Debug,
{
    /// Build a packet into `scratch` and write it in one call.
    ///
    /// # Errors
    ///
    /// - [`LinkError::Packet`] when the payload is too long or `scratch` too small.
    /// - [`LinkError::Write`] when the channel fails.
    /// - [`LinkError::ShortWrite`] when the channel accepts part of the packet.
    fn send_packet<'a>(
        &'a mut self,
        cmd1: u16,
        cmd2: u16,
        payload: &'a [u8],
        scratch: &'a mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, LinkError<Self::Error>>> + 'a;

    /// Encode a CAN message for its port and write it.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let frame = TxCanFrame::new(1, id, &[0xAA, 0xBB])?;
    /// let mut scratch = [0u8; MAX_TX_PACKET_SIZE];
    /// channel.send_can(&frame, &mut scratch).await?;
    /// ```
    fn send_can<'a>(
        &'a mut self,
        frame: &'a TxCanFrame,
        scratch: &'a mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, LinkError<Self::Error>>> + 'a;

    /// Read once and decode the bus frame the packet carries.
    ///
    /// Returns `Ok(None)` when nothing was read or when the packet is not a
    /// bus-frame delivery (`CMD_AP_TEST` / `CMD_AP_SEND`). Only the first
    /// packet of the read is looked at; use
    /// [`PacketScanner`](crate::protocol::packet::PacketScanner) on a raw
    /// read to walk all of them.
    fn recv_frame<'a>(
        &'a mut self,
        buffer: &'a mut [u8],
    ) -> impl core::future::Future<Output = Result<Option<Frame>, LinkError<Self::Error>>> + 'a;
}

impl<C: IpcChannel> FrameLink for C
where
    C::Error: core::fmt::Debug,
{
    fn send_packet<'a>(
        &'a mut self,
        cmd1: u16,
        cmd2: u16,
        payload: &'a [u8],
        scratch: &'a mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, LinkError<Self::Error>>> + 'a {
        async move {
            let len = make_packet(cmd1, cmd2, payload, scratch)?;
            write_packet(self, &scratch[..len]).await
        }
    }

    fn send_can<'a>(
        &'a mut self,
        frame: &'a TxCanFrame,
        scratch: &'a mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, LinkError<Self::Error>>> + 'a {
        async move {
            let len = frame.to_packet(scratch)?;
            write_packet(self, &scratch[..len]).await
        }
    }

    fn recv_frame<'a>(
        &'a mut self,
        buffer: &'a mut [u8],
    ) -> impl core::future::Future<Output = Result<Option<Frame>, LinkError<Self::Error>>> + 'a
    {
        async move {
            let read = self.read(buffer).await.map_err(LinkError::Read)?;
            if read == 0 {
                return Ok(None);
            }

            let packet = parse_packet(&buffer[..read])?;
            if !packet.is_bus_frame_delivery() {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "packet cmd1={=u16:#x} cmd2={=u16:#x} is not a frame delivery",
                    packet.cmd1,
                    packet.cmd2
                );
                return Ok(None);
            }

            let frame = Frame::from_payload(packet.payload)?;
            Ok(Some(frame))
        }
    }
}

/// One write; anything short of the whole packet is an error.
async fn write_packet<C: IpcChannel>(
    channel: &mut C,
    packet: &[u8],
) -> Result<usize, LinkError<C::Error>> {
    let written = channel.write(packet).await.map_err(LinkError::Write)?;
    if written != packet.len() {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "short write: {=usize} of {=usize} bytes",
            written,
            packet.len()
        );
        return Err(LinkError::ShortWrite {
            written,
            expected: packet.len(),
        });
    }
    Ok(written)
}
