//! Mailbox packet envelope.
//!
//! ```text
//! [FF 55 AA][cmd1: u16 BE][cmd2: u16 BE][length: u16 BE][payload: length bytes][crc16: u16 BE]
//! ```
//!
//! The CRC covers every byte in front of it (preamble included) and starts
//! from `0`. A packet is always `length + 11` bytes long.
use crate::core::{
    CMD_AP_SEND, CMD_AP_TEST, MAX_PACKET_PAYLOAD, PACKET_CRC_LEN, PACKET_HEADER_LEN,
    PACKET_OVERHEAD, PREAMBLE,
};
use crate::error::PacketError;
use crate::infra::codec::crc::crc16;

//==================================================================================PACKET
/// Parsed envelope. The payload borrows from the buffer it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet<'a> {
    pub cmd1: u16,
    pub cmd2: u16,
    pub payload: &'a [u8],
}

impl<'a> Packet<'a> {
    pub fn new(cmd1: u16, cmd2: u16, payload: &'a [u8]) -> Self {
        Self {
            cmd1,
            cmd2,
            payload,
        }
    }

    /// Size of the packet on the wire.
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + PACKET_OVERHEAD
    }

    /// True when the payload is a bit-packed bus frame pushed by the peer.
    pub fn is_bus_frame_delivery(&self) -> bool {
        self.cmd1 == CMD_AP_TEST && self.cmd2 == CMD_AP_SEND
    }

    /// Encode into `out`; see [`make_packet`].
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, PacketError> {
        make_packet(self.cmd1, self.cmd2, self.payload, out)
    }
}

//==================================================================================ENCODE
/// Wrap `payload` in an envelope written at the start of `out`.
///
/// Returns the packet length (`payload.len() + 11`).
///
/// # Errors
///
/// - [`PacketError::InvalidArgument`] when the payload exceeds 65535 bytes.
/// - [`PacketError::BufferTooSmall`] when `out` cannot hold the packet.
pub fn make_packet(
    cmd1: u16,
    cmd2: u16,
    payload: &[u8],
    out: &mut [u8],
) -> Result<usize, PacketError> {
    if payload.len() > MAX_PACKET_PAYLOAD {
        return Err(PacketError::InvalidArgument { len: payload.len() });
    }

    let packet_len = payload.len() + PACKET_OVERHEAD;
    if out.len() < packet_len {
        return Err(PacketError::BufferTooSmall {
            needed: packet_len,
            available: out.len(),
        });
    }

    out[0..3].copy_from_slice(&PREAMBLE);
    out[3..5].copy_from_slice(&cmd1.to_be_bytes());
    out[5..7].copy_from_slice(&cmd2.to_be_bytes());
    out[7..9].copy_from_slice(&(payload.len() as u16).to_be_bytes());

    let crc_start = PACKET_HEADER_LEN + payload.len();
    out[PACKET_HEADER_LEN..crc_start].copy_from_slice(payload);

    let crc = crc16(&out[..crc_start], 0);
    out[crc_start..crc_start + PACKET_CRC_LEN].copy_from_slice(&crc.to_be_bytes());

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "packet built: cmd1={=u16:#x} cmd2={=u16:#x} len={=usize} crc={=u16:#x}",
        cmd1,
        cmd2,
        payload.len(),
        crc
    );

    Ok(packet_len)
}

//==================================================================================DECODE
/// Validate the envelope at the start of `buffer` and borrow its payload.
///
/// Bytes after the declared packet end are ignored; use [`PacketScanner`]
/// for buffers holding several packets.
///
/// # Errors
///
/// - [`PacketError::TruncatedPacket`] when `buffer` is shorter than 11 bytes
///   or than the length the header declares.
/// - [`PacketError::FramingError`] when the preamble is not `FF 55 AA`.
/// - [`PacketError::CrcMismatch`] when the trailer disagrees with the content.
pub fn parse_packet(buffer: &[u8]) -> Result<Packet<'_>, PacketError> {
    if buffer.len() < PACKET_OVERHEAD {
        return Err(PacketError::TruncatedPacket {
            needed: PACKET_OVERHEAD,
            available: buffer.len(),
        });
    }

    if buffer[0..3] != PREAMBLE {
        return Err(PacketError::FramingError);
    }

    let cmd1 = u16::from_be_bytes([buffer[3], buffer[4]]);
    let cmd2 = u16::from_be_bytes([buffer[5], buffer[6]]);
    let length = u16::from_be_bytes([buffer[7], buffer[8]]) as usize;

    let packet_len = length + PACKET_OVERHEAD;
    if buffer.len() < packet_len {
        return Err(PacketError::TruncatedPacket {
            needed: packet_len,
            available: buffer.len(),
        });
    }

    let crc_start = PACKET_HEADER_LEN + length;
    let computed = crc16(&buffer[..crc_start], 0);
    let received = u16::from_be_bytes([buffer[crc_start], buffer[crc_start + 1]]);
    if computed != received {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "packet dropped: crc computed={=u16:#x} received={=u16:#x}",
            computed,
            received
        );
        return Err(PacketError::CrcMismatch { computed, received });
    }

    Ok(Packet {
        cmd1,
        cmd2,
        payload: &buffer[PACKET_HEADER_LEN..crc_start],
    })
}

//==================================================================================SCANNER
/// Walks a buffer holding back-to-back packets, as returned by a single
/// mailbox read.
///
/// Garbage in front of a preamble is skipped. A rejected envelope (bad CRC)
/// is reported once and scanning resumes one byte past its preamble. Scanning
/// stops at the first incomplete envelope; [`PacketScanner::remainder`] then
/// returns the unconsumed bytes. Nothing is buffered across reads.
#[derive(Debug, Clone)]
pub struct PacketScanner<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> PacketScanner<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Bytes not consumed yet: an incomplete trailing packet, or a trailing
    /// partial preamble.
    pub fn remainder(&self) -> &'a [u8] {
        &self.buffer[self.offset..]
    }

    /// Length of the longest suffix of `bytes` that could start a preamble.
    fn partial_preamble_len(bytes: &[u8]) -> usize {
        (1..PREAMBLE.len())
            .rev()
            .find(|&n| n <= bytes.len() && bytes[bytes.len() - n..] == PREAMBLE[..n])
            .unwrap_or(0)
    }
}

impl<'a> Iterator for PacketScanner<'a> {
    type Item = Result<Packet<'a>, PacketError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.buffer[self.offset..];

        let Some(start) = rest
            .windows(PREAMBLE.len())
            .position(|window| window == PREAMBLE)
        else {
            self.offset = self.buffer.len() - Self::partial_preamble_len(rest);
            return None;
        };

        let candidate = &rest[start..];
        match parse_packet(candidate) {
            Ok(packet) => {
                self.offset += start + packet.encoded_len();
                Some(Ok(packet))
            }
            Err(PacketError::TruncatedPacket { .. }) => {
                self.offset += start;
                None
            }
            Err(err) => {
                self.offset += start + 1;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
