//! Mailbox protocol: packet envelope, CAN transmit header, receive frame
//! decoding and the transport seams.
pub mod can_header;
pub mod frame;
pub mod packet;
pub mod transport;
