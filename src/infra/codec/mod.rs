//! Byte and bit level codecs used by the protocol layer.
pub mod bits;
pub mod crc;
pub mod traits;
