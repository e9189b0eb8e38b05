//! Error definitions shared across library modules.
//! Each type models one layer: bit access, packet framing, frame decoding,
//! header/message encoding, and the external mailbox link.
use thiserror_no_std::Error;

//==================================================================================BITREADER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise buffer reads.
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than a `u64` can hold.
    #[error("Cannot read more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Byte-level access requested while the cursor sits inside a byte.
    #[error("Non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

//==================================================================================BITWRITER_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors raised during bitwise writes into a buffer.
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("Attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is wider than a `u64`.
    #[error("Cannot write more than {max} bits. Requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Byte-level access requested while the cursor sits inside a byte.
    #[error("Non aligned bit. Cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

//==================================================================================PACKET_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Failures while building or parsing the mailbox packet envelope.
pub enum PacketError {
    /// Payload does not fit the 16-bit length field.
    #[error("Payload of {len} bytes exceeds the 16-bit length field")]
    InvalidArgument { len: usize },
    /// Output buffer cannot hold the packet.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// The buffer does not start with `FF 55 AA`.
    #[error("Bad preamble")]
    FramingError,
    /// Fewer bytes than the envelope (or its declared length) requires.
    #[error("Truncated packet -> needed: {needed}, available: {available}")]
    TruncatedPacket { needed: usize, available: usize },
    /// CRC trailer disagrees with the recomputed value.
    #[error("CRC mismatch -> computed: {computed:#06x}, received: {received:#06x}")]
    CrcMismatch { computed: u16, received: u16 },
}

//==================================================================================FRAME_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Failures while decoding a bit-packed receive frame or CAN header.
pub enum FrameError {
    /// Buffer shorter than the fixed header.
    #[error("Truncated frame -> needed: {needed}, available: {available}")]
    TruncatedFrame { needed: usize, available: usize },
    /// Frame kind discriminator other than "data frame".
    #[error("Unsupported frame kind {kind}")]
    UnsupportedFrameKind { kind: u8 },
    /// Identifier wider than its declared format allows.
    #[error("Identifier {id:#x} exceeds {max:#x}")]
    IdOutOfRange { id: u32, max: u32 },
    /// Bit-level access failed.
    #[error("BitReader error: {err}")]
    BitReader { err: BitReaderError },
}

impl From<BitReaderError> for FrameError {
    fn from(err: BitReaderError) -> Self {
        FrameError::BitReader { err }
    }
}

//==================================================================================ENCODE_ERRORS
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Failures while encoding a CAN header, a transmit message or a frame.
pub enum EncodeError {
    /// Identifier wider than the selected format (11 or 29 bits).
    #[error("Identifier {id:#x} exceeds {max:#x}")]
    IdOutOfRange { id: u32, max: u32 },
    /// Too many data bytes for the frame format.
    #[error("Data length {len} exceeds {max}")]
    InvalidDataLength { len: usize, max: usize },
    /// Sub-microsecond timestamp not representable (multiple of 10 ns, at most 2550 ns).
    #[error("Timestamp of {ns} ns cannot be encoded")]
    TimestampOutOfRange { ns: u16 },
    /// Output buffer cannot hold the encoded bytes.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// Bit-level write failed.
    #[error("BitWriter error: {err}")]
    BitWriter { err: BitWriterError },
    /// Wrapping the encoded payload in an envelope failed.
    #[error("Packet error: {err}")]
    Packet { err: PacketError },
}

impl From<BitWriterError> for EncodeError {
    fn from(err: BitWriterError) -> Self {
        EncodeError::BitWriter { err }
    }
}

impl From<PacketError> for EncodeError {
    fn from(err: PacketError) -> Self {
        EncodeError::Packet { err }
    }
}

//==================================================================================LINK_ERRORS
#[derive(Debug, Error)]
/// Errors surfaced by the mailbox link helpers (encode + transmit, receive + decode).
pub enum LinkError<E: core::fmt::Debug> {
    /// Channel refused or failed the write.
    #[error("Channel write error: {0:?}")]
    Write(E),
    /// Channel failed the read.
    #[error("Channel read error: {0:?}")]
    Read(E),
    /// Channel accepted fewer bytes than the packet holds.
    #[error("Short write -> written: {written}, expected: {expected}")]
    ShortWrite { written: usize, expected: usize },

    #[error(transparent)]
    Packet(#[from] PacketError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
