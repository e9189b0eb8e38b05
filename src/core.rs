//! Wire constants shared by the packet framer, the header codec and the
//! frame decoder. Values mirror what the mailbox peer firmware emits.

//==================================================================================PACKET
/// Packet start marker.
pub const PREAMBLE: [u8; 3] = [0xFF, 0x55, 0xAA];

/// Preamble + cmd1 + cmd2 + length.
pub const PACKET_HEADER_LEN: usize = 9;

/// Trailing CRC16 size.
pub const PACKET_CRC_LEN: usize = 2;

/// Bytes added around a payload: `PACKET_HEADER_LEN + PACKET_CRC_LEN`.
pub const PACKET_OVERHEAD: usize = PACKET_HEADER_LEN + PACKET_CRC_LEN;

/// Largest payload the 16-bit length field can describe.
pub const MAX_PACKET_PAYLOAD: usize = u16::MAX as usize;

//==================================================================================COMMANDS
/// `cmd1` used for bus traffic in both directions.
pub const CMD_AP_TEST: u16 = 0x0001;

/// `cmd2` marking an inbound bus-frame delivery (paired with [`CMD_AP_TEST`]).
pub const CMD_AP_SEND: u16 = 0x0FFF;

//==================================================================================FRAMES
/// Fixed bit-packed header in front of every received frame payload.
pub const FRAME_HEADER_LEN: usize = 15;

/// Largest `data_len` representable by the receive record.
pub const MAX_FRAME_DATA: usize = u8::MAX as usize;

/// `data_len` reported when the derived length does not fit a byte.
pub const DEGENERATE_DATA_LEN: u8 = 8;

/// Size of the outbound CAN header.
pub const CAN_HEADER_LEN: usize = 5;

/// Classic CAN / LIN data limit.
pub const MAX_CLASSIC_DATA: usize = 8;

/// CAN FD data limit.
pub const MAX_FD_DATA: usize = 64;

//==================================================================================IDENTIFIERS
pub const STANDARD_ID_MAX: u32 = 0x7FF;
pub const EXTENDED_ID_MAX: u32 = 0x1FFF_FFFF;
pub const LIN_ID_MAX: u32 = 0x3F;

/// Tag OR-ed into extended identifiers when building routing keys, so that
/// standard `0x123` and extended `0x123` never collide.
pub const EXTENDED_ROUTE_TAG: u32 = 0x8000_0000;

/// Scale applied to the raw sub-microsecond counter.
pub const TIMESTAMP_NS_SCALE: u16 = 10;
