//! Abstraction traits used by the transport layer (byte channel and the
//! packet/frame helpers built on it).
pub mod frame_link;
pub mod ipc_channel;
