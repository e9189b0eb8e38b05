//! Outbound CAN message: the 5-byte CAN header followed by the data bytes,
//! sent to the peer with `cmd1 = CMD_AP_TEST` and `cmd2 = port`.
use crate::core::{CAN_HEADER_LEN, CMD_AP_TEST, MAX_CLASSIC_DATA, MAX_FD_DATA};
use crate::error::EncodeError;
use crate::infra::codec::traits::ToPayload;
use crate::protocol::can_header::CanHeader;
use crate::protocol::packet::make_packet;
use embedded_can::Id;

/// CAN message addressed to one bus port of the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxCanFrame {
    pub port: u8,
    pub id: Id,
    pub fd: bool,
    /// Bit-rate switch, FD only.
    pub brs: bool,
    /// Ask the peer to timestamp the transmission.
    pub timestamp: bool,
    data: [u8; MAX_FD_DATA],
    data_len: u8,
}

impl TxCanFrame {
    /// Classic CAN message (at most 8 data bytes), timestamp requested.
    pub fn new(port: u8, id: Id, data: &[u8]) -> Result<Self, EncodeError> {
        Self::build(port, id, false, false, data)
    }

    /// CAN FD message (at most 64 data bytes), timestamp requested.
    pub fn new_fd(port: u8, id: Id, brs: bool, data: &[u8]) -> Result<Self, EncodeError> {
        Self::build(port, id, true, brs, data)
    }

    fn build(port: u8, id: Id, fd: bool, brs: bool, data: &[u8]) -> Result<Self, EncodeError> {
        let max = if fd { MAX_FD_DATA } else { MAX_CLASSIC_DATA };
        if data.len() > max {
            return Err(EncodeError::InvalidDataLength {
                len: data.len(),
                max,
            });
        }

        let mut buffer = [0u8; MAX_FD_DATA];
        buffer[..data.len()].copy_from_slice(data);

        Ok(Self {
            port,
            id,
            fd,
            brs: fd && brs,
            timestamp: true,
            data: buffer,
            data_len: data.len() as u8,
        })
    }

    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.data_len as usize]
    }

    pub fn header(&self) -> CanHeader {
        CanHeader::from_id(self.timestamp, self.id, self.fd, self.brs)
    }

    /// Envelope commands for this message.
    pub fn commands(&self) -> (u16, u16) {
        (CMD_AP_TEST, self.port as u16)
    }

    /// Write the complete packet into `out` and return its length.
    ///
    /// ```
    /// use axon_ipc::protocol::transport::tx_can_frame::TxCanFrame;
    /// use embedded_can::{Id, StandardId};
    ///
    /// let id = Id::Standard(StandardId::new(0x123).unwrap());
    /// let frame = TxCanFrame::new(1, id, &[0xAA, 0xBB]).unwrap();
    /// let mut out = [0u8; 32];
    /// let len = frame.to_packet(&mut out).unwrap();
    /// assert_eq!(len, 5 + 2 + 11);
    /// assert_eq!(&out[3..7], &[0x00, 0x01, 0x00, 0x01]);
    /// ```
    pub fn to_packet(&self, out: &mut [u8]) -> Result<usize, EncodeError> {
        let mut payload = [0u8; CAN_HEADER_LEN + MAX_FD_DATA];
        let len = self.to_payload(&mut payload)?;
        let (cmd1, cmd2) = self.commands();
        let written = make_packet(cmd1, cmd2, &payload[..len], out)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "tx can: port={=u8} len={=u8} packet={=usize}",
            self.port,
            self.data_len,
            written
        );

        Ok(written)
    }
}

impl ToPayload for TxCanFrame {
    type Error = EncodeError;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let len = self.payload_len();
        if buffer.len() < len {
            return Err(EncodeError::BufferTooSmall {
                needed: len,
                available: buffer.len(),
            });
        }
        self.header().to_payload(&mut buffer[..CAN_HEADER_LEN])?;
        buffer[CAN_HEADER_LEN..len].copy_from_slice(self.data());
        Ok(len)
    }

    fn payload_len(&self) -> usize {
        CAN_HEADER_LEN + self.data_len as usize
    }
}

#[cfg(test)]
#[path = "tx_can_frame_tests.rs"]
mod tests;
