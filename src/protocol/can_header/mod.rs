//! Five-byte header prepended to every CAN message sent to the peer.
//!
//! # Bit layout (LSB-first, little-endian 40-bit word)
//!
//! ```text
//! Bit   0        ( 1 bit ) : Timestamp request
//! Bits  1-5      ( 5 bits) : Reserved
//! Bit   6        ( 1 bit ) : Protocol (always 0, CAN)
//! Bits  7-35     (29 bits) : Identifier (standard ids use the low 11 bits)
//! Bit   36       ( 1 bit ) : FDF
//! Bit   37       ( 1 bit ) : RTR (always 0 on transmit)
//! Bit   38       ( 1 bit ) : IDE
//! Bit   39       ( 1 bit ) : BRS (only meaningful with FDF)
//! ```
use crate::core::{CAN_HEADER_LEN, EXTENDED_ID_MAX, STANDARD_ID_MAX};
use crate::error::{EncodeError, FrameError};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::{FromPayload, ToPayload};
use crate::protocol::frame::Protocol;
use embedded_can::Id;

const RESERVED_BITS: u8 = 5;
const ID_FIELD_BITS: u8 = 29;

//==================================================================================CAN_HEADER
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanHeader {
    /// Ask the peer to timestamp the transmission.
    pub timestamp: bool,
    pub protocol: Protocol,
    pub id: u32,
    pub fd: bool,
    pub rtr: bool,
    pub extended: bool,
    pub brs: bool,
}

impl CanHeader {
    /// Transmit header for a CAN message. `brs` is dropped for classic frames.
    ///
    /// # Errors
    ///
    /// [`EncodeError::IdOutOfRange`] when `id` does not fit 11 bits (standard)
    /// or 29 bits (extended).
    pub fn new(
        timestamp: bool,
        id: u32,
        fd: bool,
        extended: bool,
        brs: bool,
    ) -> Result<Self, EncodeError> {
        let max = if extended {
            EXTENDED_ID_MAX
        } else {
            STANDARD_ID_MAX
        };
        if id > max {
            return Err(EncodeError::IdOutOfRange { id, max });
        }

        Ok(Self {
            timestamp,
            protocol: Protocol::Can,
            id,
            fd,
            rtr: false,
            extended,
            brs: fd && brs,
        })
    }

    /// Same as [`CanHeader::new`], width taken from the identifier type.
    pub fn from_id(timestamp: bool, id: Id, fd: bool, brs: bool) -> Self {
        let (raw, extended) = match id {
            Id::Standard(std_id) => (std_id.as_raw() as u32, false),
            Id::Extended(ext_id) => (ext_id.as_raw(), true),
        };
        Self {
            timestamp,
            protocol: Protocol::Can,
            id: raw,
            fd,
            rtr: false,
            extended,
            brs: fd && brs,
        }
    }

    /// Encode into a fresh array.
    pub fn to_bytes(&self) -> Result<[u8; CAN_HEADER_LEN], EncodeError> {
        let mut out = [0u8; CAN_HEADER_LEN];
        self.to_payload(&mut out)?;
        Ok(out)
    }
}

/// Build the transmit header for a CAN message.
///
/// ```
/// use axon_ipc::protocol::can_header::encode_can_header;
///
/// let header = encode_can_header(true, 0x123, false, false, false).unwrap();
/// assert_eq!(header, [0x81, 0x91, 0x00, 0x00, 0x00]);
/// ```
pub fn encode_can_header(
    timestamp_enabled: bool,
    can_id: u32,
    fd: bool,
    extended: bool,
    brs: bool,
) -> Result<[u8; CAN_HEADER_LEN], EncodeError> {
    CanHeader::new(timestamp_enabled, can_id, fd, extended, brs)?.to_bytes()
}

impl ToPayload for CanHeader {
    type Error = EncodeError;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        if buffer.len() < CAN_HEADER_LEN {
            return Err(EncodeError::BufferTooSmall {
                needed: CAN_HEADER_LEN,
                available: buffer.len(),
            });
        }

        let target = &mut buffer[..CAN_HEADER_LEN];
        target.fill(0);
        let mut writer = BitWriter::new(target);
        writer.write_flag(self.timestamp)?;
        writer.skip(RESERVED_BITS)?;
        writer.write_flag(self.protocol.bit())?;
        writer.write_bits(self.id as u64, ID_FIELD_BITS)?;
        writer.write_flag(self.fd)?;
        writer.write_flag(self.rtr)?;
        writer.write_flag(self.extended)?;
        writer.write_flag(self.fd && self.brs)?;

        Ok(CAN_HEADER_LEN)
    }

    fn payload_len(&self) -> usize {
        CAN_HEADER_LEN
    }
}

impl FromPayload for CanHeader {
    type Error = FrameError;

    /// Read a header back, e.g. on the peer side of a simulated link.
    fn from_payload(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < CAN_HEADER_LEN {
            return Err(FrameError::TruncatedFrame {
                needed: CAN_HEADER_LEN,
                available: bytes.len(),
            });
        }

        let mut reader = BitReader::new(&bytes[..CAN_HEADER_LEN]);
        let timestamp = reader.read_flag()?;
        reader.skip(RESERVED_BITS)?;
        let protocol = Protocol::from_bit(reader.read_flag()?);
        let id = reader.read_u32(ID_FIELD_BITS)?;
        let fd = reader.read_flag()?;
        let rtr = reader.read_flag()?;
        let extended = reader.read_flag()?;
        let brs = reader.read_flag()?;

        if !extended && id > STANDARD_ID_MAX {
            return Err(FrameError::IdOutOfRange {
                id,
                max: STANDARD_ID_MAX,
            });
        }

        Ok(Self {
            timestamp,
            protocol,
            id,
            fd,
            rtr,
            extended,
            brs,
        })
    }
}
