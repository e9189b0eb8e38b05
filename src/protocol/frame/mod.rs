//! Bit-packed bus frames pushed by the mailbox peer.
//!
//! # Bit layout (LSB-first, bit `n` is bit `n % 8` of byte `n / 8`)
//!
//! ```text
//! Bit   0        ( 1 bit ) : Frame kind (0 = data frame)
//! Bits  1-8      ( 8 bits) : Source port
//! Bits  9-16     ( 8 bits) : Sub-microsecond counter, 10 ns units
//! Bits 17-48     (32 bits) : Timestamp, microseconds, low word
//! Bits 49-80     (32 bits) : Timestamp, microseconds, high word
//! Bits 81-86     ( 6 bits) : Reserved
//! Bit  87        ( 1 bit ) : Protocol (0 = CAN, 1 = LIN)
//! Bits 88-116    (29 bits) : Identifier (11 low bits standard CAN, 6 low bits LIN)
//! Bit  117       ( 1 bit ) : FDF
//! Bit  118       ( 1 bit ) : RTR
//! Bit  119       ( 1 bit ) : IDE
//! Bytes 15..               : Data
//! ```
use crate::core::{
    DEGENERATE_DATA_LEN, EXTENDED_ID_MAX, EXTENDED_ROUTE_TAG, FRAME_HEADER_LEN, LIN_ID_MAX,
    MAX_FRAME_DATA, STANDARD_ID_MAX, TIMESTAMP_NS_SCALE,
};
use crate::error::{EncodeError, FrameError};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::{FromPayload, ToPayload};
use core::fmt;
use embedded_can::{ExtendedId, Id, StandardId};

/// Frame kind discriminator of a data frame.
const DATA_FRAME: u8 = 0;
/// Reserved bits between the timestamp and the protocol flag.
const RESERVED_BITS: u8 = 6;
/// Width of the identifier field, whatever the frame type.
const ID_FIELD_BITS: u8 = 29;

//==================================================================================PROTOCOL
/// Bus the frame was captured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Protocol {
    Can = 0,
    Lin = 1,
}

impl Protocol {
    pub(crate) fn from_bit(bit: bool) -> Self {
        if bit {
            Protocol::Lin
        } else {
            Protocol::Can
        }
    }

    pub(crate) fn bit(self) -> bool {
        self == Protocol::Lin
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Can => "CAN",
            Protocol::Lin => "LIN",
        })
    }
}

//==================================================================================FRAME_TYPE
/// Classification derived from the protocol, IDE and FDF bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameType {
    CanBase,
    CanExt,
    CanFdBase,
    CanFdExt,
    LinRx,
}

impl FrameType {
    /// LIN ignores the CAN flags; CAN splits on IDE then FDF.
    pub fn classify(protocol: Protocol, extended: bool, fd: bool) -> Self {
        match (protocol, extended, fd) {
            (Protocol::Lin, _, _) => FrameType::LinRx,
            (Protocol::Can, false, false) => FrameType::CanBase,
            (Protocol::Can, false, true) => FrameType::CanFdBase,
            (Protocol::Can, true, false) => FrameType::CanExt,
            (Protocol::Can, true, true) => FrameType::CanFdExt,
        }
    }

    pub fn protocol(self) -> Protocol {
        match self {
            FrameType::LinRx => Protocol::Lin,
            _ => Protocol::Can,
        }
    }

    pub fn is_extended(self) -> bool {
        matches!(self, FrameType::CanExt | FrameType::CanFdExt)
    }

    pub fn is_fd(self) -> bool {
        matches!(self, FrameType::CanFdBase | FrameType::CanFdExt)
    }

    /// Largest identifier this frame type can carry.
    pub fn id_max(self) -> u32 {
        match self {
            FrameType::CanBase | FrameType::CanFdBase => STANDARD_ID_MAX,
            FrameType::CanExt | FrameType::CanFdExt => EXTENDED_ID_MAX,
            FrameType::LinRx => LIN_ID_MAX,
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrameType::CanBase => "CAN_BASE",
            FrameType::CanExt => "CAN_EXT",
            FrameType::CanFdBase => "CANFD_BASE",
            FrameType::CanFdExt => "CANFD_EXT",
            FrameType::LinRx => "LIN_RX",
        })
    }
}

//==================================================================================FRAME
/// Decoded receive frame. Owns its data; `data_len` bytes of `data` are valid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub port: u8,
    pub protocol: Protocol,
    /// Sub-microsecond part, already scaled to nanoseconds.
    pub timestamp_ns: u16,
    pub timestamp_us_low: u32,
    pub timestamp_us_high: u32,
    pub frame_type: FrameType,
    /// Wire identifier, width given by `frame_type`.
    pub id: u32,
    pub rtr: bool,
    pub data: [u8; MAX_FRAME_DATA],
    pub data_len: u8,
}

impl Frame {
    /// Build a frame with zeroed timestamps, e.g. to feed a peer simulator.
    pub fn new(port: u8, frame_type: FrameType, id: u32, data: &[u8]) -> Result<Self, EncodeError> {
        let max = frame_type.id_max();
        if id > max {
            return Err(EncodeError::IdOutOfRange { id, max });
        }
        if data.len() > MAX_FRAME_DATA {
            return Err(EncodeError::InvalidDataLength {
                len: data.len(),
                max: MAX_FRAME_DATA,
            });
        }

        let mut buffer = [0u8; MAX_FRAME_DATA];
        buffer[..data.len()].copy_from_slice(data);

        Ok(Self {
            port,
            protocol: frame_type.protocol(),
            timestamp_ns: 0,
            timestamp_us_low: 0,
            timestamp_us_high: 0,
            frame_type,
            id,
            rtr: false,
            data: buffer,
            data_len: data.len() as u8,
        })
    }

    /// Set the capture time from its microsecond and nanosecond parts.
    pub fn with_timestamp(mut self, timestamp_us: u64, timestamp_ns: u16) -> Self {
        self.timestamp_us_low = timestamp_us as u32;
        self.timestamp_us_high = (timestamp_us >> 32) as u32;
        self.timestamp_ns = timestamp_ns;
        self
    }

    pub fn with_rtr(mut self, rtr: bool) -> Self {
        self.rtr = rtr;
        self
    }

    /// Valid data bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.data_len as usize]
    }

    /// Full 64-bit microsecond timestamp.
    pub fn timestamp_us(&self) -> u64 {
        ((self.timestamp_us_high as u64) << 32) | self.timestamp_us_low as u64
    }

    /// Routing key: extended identifiers carry [`EXTENDED_ROUTE_TAG`] so they
    /// never collide with a standard identifier of the same value.
    pub fn route_id(&self) -> u32 {
        if self.frame_type.is_extended() {
            self.id | EXTENDED_ROUTE_TAG
        } else {
            self.id
        }
    }

    /// Typed CAN identifier; `None` for LIN frames.
    pub fn can_id(&self) -> Option<Id> {
        match self.frame_type {
            FrameType::CanBase | FrameType::CanFdBase => {
                StandardId::new(self.id as u16).map(Id::Standard)
            }
            FrameType::CanExt | FrameType::CanFdExt => ExtendedId::new(self.id).map(Id::Extended),
            FrameType::LinRx => None,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.frame_type {
            FrameType::CanBase => "CAN_ID",
            FrameType::CanExt => "CAN_ID(ext)",
            FrameType::CanFdBase => "CANFD_ID",
            FrameType::CanFdExt => "CANFD_ID(ext)",
            FrameType::LinRx => "LIN_ID",
        };
        write!(
            f,
            "Protocol: {}, Port:{}, data_len:{}, {}:0x{:X}, Data:",
            self.protocol, self.port, self.data_len, label, self.id
        )?;
        for byte in self.data() {
            write!(f, " {:02x}", byte)?;
        }
        Ok(())
    }
}

//==================================================================================DECODE
/// Decode the inner payload of a bus-frame delivery.
///
/// Data longer than 255 bytes cannot be described by `data_len`; such frames
/// decode with `data_len = 8` and the first eight data bytes.
///
/// # Errors
///
/// - [`FrameError::TruncatedFrame`] when `buffer` is shorter than the 15-byte header.
/// - [`FrameError::UnsupportedFrameKind`] when the kind bit is not "data frame".
pub fn decode_frame(buffer: &[u8]) -> Result<Frame, FrameError> {
    if buffer.len() < FRAME_HEADER_LEN {
        return Err(FrameError::TruncatedFrame {
            needed: FRAME_HEADER_LEN,
            available: buffer.len(),
        });
    }

    let mut reader = BitReader::new(buffer);

    let kind = reader.read_u8(1)?;
    if kind != DATA_FRAME {
        #[cfg(feature = "defmt")]
        defmt::debug!("frame kind {=u8} ignored", kind);
        return Err(FrameError::UnsupportedFrameKind { kind });
    }

    let port = reader.read_u8(8)?;
    let timestamp_ns = reader.read_u16(8)? * TIMESTAMP_NS_SCALE;
    let timestamp_us_low = reader.read_u32(32)?;
    let timestamp_us_high = reader.read_u32(32)?;
    reader.skip(RESERVED_BITS)?;
    let protocol = Protocol::from_bit(reader.read_flag()?);

    let id_field = reader.read_u32(ID_FIELD_BITS)?;
    let fdf = reader.read_flag()?;
    let rtr = reader.read_flag()?;
    let ide = reader.read_flag()?;

    let frame_type = FrameType::classify(protocol, ide, fdf);
    let id = id_field & frame_type.id_max();

    let payload = reader.tail()?;
    let data_len = match u8::try_from(payload.len()) {
        Ok(len) => len,
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "frame data of {=usize} bytes clamped to {=u8}",
                payload.len(),
                DEGENERATE_DATA_LEN
            );
            DEGENERATE_DATA_LEN
        }
    };
    let mut data = [0u8; MAX_FRAME_DATA];
    data[..data_len as usize].copy_from_slice(&payload[..data_len as usize]);

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "frame decoded: port={=u8} id={=u32:#x} len={=u8}",
        port,
        id,
        data_len
    );

    Ok(Frame {
        port,
        protocol,
        timestamp_ns,
        timestamp_us_low,
        timestamp_us_high,
        frame_type,
        id,
        rtr,
        data,
        data_len,
    })
}

impl FromPayload for Frame {
    type Error = FrameError;

    fn from_payload(bytes: &[u8]) -> Result<Self, Self::Error> {
        decode_frame(bytes)
    }
}

//==================================================================================ENCODE
impl ToPayload for Frame {
    type Error = EncodeError;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let max = self.frame_type.id_max();
        if self.id > max {
            return Err(EncodeError::IdOutOfRange { id: self.id, max });
        }
        if self.timestamp_ns % TIMESTAMP_NS_SCALE != 0
            || self.timestamp_ns / TIMESTAMP_NS_SCALE > u8::MAX as u16
        {
            return Err(EncodeError::TimestampOutOfRange {
                ns: self.timestamp_ns,
            });
        }

        let len = self.payload_len();
        if buffer.len() < len {
            return Err(EncodeError::BufferTooSmall {
                needed: len,
                available: buffer.len(),
            });
        }

        let target = &mut buffer[..len];
        target[..FRAME_HEADER_LEN].fill(0);
        let mut writer = BitWriter::new(target);
        writer.write_bits(DATA_FRAME as u64, 1)?;
        writer.write_bits(self.port as u64, 8)?;
        writer.write_bits((self.timestamp_ns / TIMESTAMP_NS_SCALE) as u64, 8)?;
        writer.write_bits(self.timestamp_us_low as u64, 32)?;
        writer.write_bits(self.timestamp_us_high as u64, 32)?;
        writer.skip(RESERVED_BITS)?;
        writer.write_flag(self.frame_type.protocol().bit())?;
        writer.write_bits(self.id as u64, ID_FIELD_BITS)?;
        writer.write_flag(self.frame_type.is_fd())?;
        writer.write_flag(self.rtr)?;
        writer.write_flag(self.frame_type.is_extended())?;
        writer.write_slice(self.data())?;

        Ok(len)
    }

    fn payload_len(&self) -> usize {
        FRAME_HEADER_LEN + self.data_len as usize
    }
}
