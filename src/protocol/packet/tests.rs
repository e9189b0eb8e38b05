//! Envelope encode/decode and stream scanning.
use super::*;

/// `cmd1 = 0x0102`, `cmd2 = 0x0304`, payload `DE AD BE EF`.
const SAMPLE: [u8; 15] = [
    0xFF, 0x55, 0xAA, 0x01, 0x02, 0x03, 0x04, 0x00, 0x04, 0xDE, 0xAD, 0xBE, 0xEF, 0x3D, 0x62,
];

//==================================================================================ENCODE
#[test]
/// Byte-exact output for a known packet.
fn test_make_packet_reference() {
    let mut out = [0u8; 32];
    let len = make_packet(0x0102, 0x0304, &[0xDE, 0xAD, 0xBE, 0xEF], &mut out).unwrap();
    assert_eq!(len, 15);
    assert_eq!(&out[..len], &SAMPLE);
}

#[test]
/// Empty payload still carries preamble, commands, length and CRC.
fn test_make_packet_empty_payload() {
    let mut out = [0u8; 11];
    let len = make_packet(CMD_AP_TEST, CMD_AP_SEND, &[], &mut out).unwrap();
    assert_eq!(len, 11);
    assert_eq!(
        out,
        [0xFF, 0x55, 0xAA, 0x00, 0x01, 0x0F, 0xFF, 0x00, 0x00, 0x88, 0x7A]
    );
}

#[test]
/// Output buffer must hold `payload + 11` bytes.
fn test_make_packet_buffer_too_small() {
    let mut out = [0u8; 14];
    assert_eq!(
        make_packet(1, 2, &[0; 4], &mut out),
        Err(PacketError::BufferTooSmall {
            needed: 15,
            available: 14
        })
    );
}

#[test]
/// Payloads above the 16-bit length field are rejected.
fn test_make_packet_payload_too_long() {
    let payload = [0u8; MAX_PACKET_PAYLOAD + 1];
    let mut out = [0u8; 16];
    assert_eq!(
        make_packet(1, 2, &payload, &mut out),
        Err(PacketError::InvalidArgument {
            len: MAX_PACKET_PAYLOAD + 1
        })
    );
}

#[test]
/// The largest payload round-trips.
fn test_max_payload_round_trip() {
    let mut payload = [0u8; MAX_PACKET_PAYLOAD];
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte = i as u8;
    }
    let mut out = [0u8; MAX_PACKET_PAYLOAD + PACKET_OVERHEAD];
    let len = make_packet(0xFFFF, 0x0000, &payload, &mut out).unwrap();
    assert_eq!(len, out.len());
    assert_eq!(&out[7..9], &[0xFF, 0xFF]);

    let packet = parse_packet(&out).unwrap();
    assert_eq!(packet.cmd1, 0xFFFF);
    assert_eq!(packet.cmd2, 0x0000);
    assert_eq!(packet.payload, &payload[..]);
}

//==================================================================================DECODE
#[test]
/// Known packet parses back into its parts.
fn test_parse_packet_reference() {
    let packet = parse_packet(&SAMPLE).unwrap();
    assert_eq!(packet, Packet::new(0x0102, 0x0304, &[0xDE, 0xAD, 0xBE, 0xEF]));
    assert_eq!(packet.encoded_len(), SAMPLE.len());
    assert!(!packet.is_bus_frame_delivery());
}

#[test]
/// Ten bytes is one short of the smallest packet; eleven is enough.
fn test_parse_packet_minimum_length() {
    let minimal = [0xFF, 0x55, 0xAA, 0x00, 0x01, 0x0F, 0xFF, 0x00, 0x00, 0x88, 0x7A];
    assert_eq!(
        parse_packet(&minimal[..10]),
        Err(PacketError::TruncatedPacket {
            needed: 11,
            available: 10
        })
    );

    let packet = parse_packet(&minimal).unwrap();
    assert!(packet.payload.is_empty());
    assert!(packet.is_bus_frame_delivery());
}

#[test]
/// Wrong first bytes are a framing error.
fn test_parse_packet_bad_preamble() {
    let mut buffer = SAMPLE;
    buffer[1] = 0x56;
    assert_eq!(parse_packet(&buffer), Err(PacketError::FramingError));
}

#[test]
/// Declared length beyond the buffer is a truncation.
fn test_parse_packet_declared_length_too_long() {
    assert_eq!(
        parse_packet(&SAMPLE[..14]),
        Err(PacketError::TruncatedPacket {
            needed: 15,
            available: 14
        })
    );
}

#[test]
/// Trailing bytes after the packet are ignored.
fn test_parse_packet_ignores_trailing_bytes() {
    let mut buffer = [0u8; 20];
    buffer[..15].copy_from_slice(&SAMPLE);
    buffer[15..].copy_from_slice(&[0xFF, 0x55, 0xAA, 0x00, 0x00]);
    let packet = parse_packet(&buffer).unwrap();
    assert_eq!(packet.payload, &[0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
/// Any single flipped bit in the commands or payload is caught by the CRC.
fn test_parse_packet_detects_single_bit_flips() {
    for byte in 3..13 {
        if byte == 7 || byte == 8 {
            continue;
        }
        for bit in 0..8 {
            let mut buffer = SAMPLE;
            buffer[byte] ^= 1 << bit;
            assert!(
                matches!(parse_packet(&buffer), Err(PacketError::CrcMismatch { .. })),
                "flip byte {byte} bit {bit} went undetected"
            );
        }
    }
}

#[test]
/// Flips in the preamble or the length field never yield a packet.
fn test_parse_packet_rejects_header_corruption() {
    for byte in [0usize, 1, 2, 7, 8] {
        for bit in 0..8 {
            let mut buffer = SAMPLE;
            buffer[byte] ^= 1 << bit;
            assert!(parse_packet(&buffer).is_err(), "byte {byte} bit {bit}");
        }
    }
}

#[test]
/// A corrupted CRC trailer is reported with both values.
fn test_parse_packet_crc_trailer() {
    let mut buffer = SAMPLE;
    buffer[14] = 0x63;
    assert_eq!(
        parse_packet(&buffer),
        Err(PacketError::CrcMismatch {
            computed: 0x3D62,
            received: 0x3D63
        })
    );
}

//==================================================================================SCANNER
#[test]
/// Garbage, two packets and a truncated third one.
fn test_scanner_back_to_back() {
    let mut stream = [0u8; 64];
    stream[..2].copy_from_slice(&[0x00, 0x13]);
    let first_end = 2 + make_packet(0x0001, 0x0FFF, &[1, 2, 3], &mut stream[2..]).unwrap();
    let third_start =
        first_end + make_packet(0x0002, 0x0005, &[], &mut stream[first_end..]).unwrap();
    let end = third_start + make_packet(0x0003, 0x0006, &[9; 8], &mut stream[third_start..]).unwrap();
    let stream = &stream[..end - 4];

    let mut scanner = PacketScanner::new(stream);
    let first = scanner.next().unwrap().unwrap();
    assert_eq!(first, Packet::new(0x0001, 0x0FFF, &[1, 2, 3]));
    let second = scanner.next().unwrap().unwrap();
    assert_eq!(second, Packet::new(0x0002, 0x0005, &[]));
    assert!(scanner.next().is_none());
    assert_eq!(scanner.remainder(), &stream[third_start..]);
    assert!(scanner.next().is_none());
}

#[test]
/// A bad packet is reported and the following one is still found.
fn test_scanner_resyncs_after_crc_error() {
    let mut stream = [0u8; 30];
    stream[..15].copy_from_slice(&SAMPLE);
    stream[10] ^= 0x01;
    stream[15..].copy_from_slice(&SAMPLE);

    let mut scanner = PacketScanner::new(&stream);
    assert!(matches!(
        scanner.next(),
        Some(Err(PacketError::CrcMismatch { .. }))
    ));
    assert_eq!(scanner.next(), Some(Ok(Packet::new(0x0102, 0x0304, &[0xDE, 0xAD, 0xBE, 0xEF]))));
    assert!(scanner.next().is_none());
    assert!(scanner.remainder().is_empty());
}

#[test]
/// A dangling `FF 55` is kept for the next read.
fn test_scanner_keeps_partial_preamble() {
    let mut stream = [0u8; 17];
    stream[..15].copy_from_slice(&SAMPLE);
    stream[15..].copy_from_slice(&[0xFF, 0x55]);

    let mut scanner = PacketScanner::new(&stream);
    assert!(scanner.next().unwrap().is_ok());
    assert!(scanner.next().is_none());
    assert_eq!(scanner.remainder(), &[0xFF, 0x55]);
}

#[test]
/// Nothing but noise.
fn test_scanner_noise_only() {
    let noise = [0x01, 0x02, 0x03, 0x04];
    let mut scanner = PacketScanner::new(&noise);
    assert!(scanner.next().is_none());
    assert!(scanner.remainder().is_empty());
}
