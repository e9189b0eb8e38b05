//! Low-level building blocks: bit cursors, CRC16 and the payload traits.
pub mod codec;
