//! `axon-ipc` library: codecs for the mailbox link between an application
//! core and the vehicle-network core, in a `no_std` environment. The crate
//! exposes the infrastructure modules (bit cursors, CRC), the protocol logic
//! (packet envelope, CAN header, receive frames) and the transport seams an
//! external byte channel plugs into.
#![no_std]
//==================================================================================
/// Wire constants shared by every codec.
pub mod core;
/// Layered errors (bit access, packet framing, frame decoding, encoding, link).
pub mod error;
/// Bit-level cursors, CRC-16 and the serialization traits.
pub mod infra;
/// Mailbox protocol: packets, CAN header, receive frames and transport.
pub mod protocol;
//==================================================================================
pub use error::{EncodeError, FrameError, LinkError, PacketError};
pub use infra::codec::crc::crc16;
pub use protocol::can_header::{encode_can_header, CanHeader};
pub use protocol::frame::{decode_frame, Frame, FrameType, Protocol};
pub use protocol::packet::{make_packet, parse_packet, Packet, PacketScanner};
pub use protocol::transport::mailbox_channel::MailboxChannel;
pub use protocol::transport::traits::{frame_link::FrameLink, ipc_channel::IpcChannel};
pub use protocol::transport::tx_can_frame::TxCanFrame;
