use super::*;
use crate::error::PacketError;
use crate::protocol::packet::parse_packet;
use embedded_can::{ExtendedId, StandardId};

fn std_id(raw: u16) -> Id {
    Id::Standard(StandardId::new(raw).unwrap())
}

fn ext_id(raw: u32) -> Id {
    Id::Extended(ExtendedId::new(raw).unwrap())
}

#[test]
/// Classic frame on port 1, id 0x123, two data bytes.
fn test_classic_packet_reference() {
    let frame = TxCanFrame::new(1, std_id(0x123), &[0xAA, 0xBB]).unwrap();
    let mut out = [0u8; MAX_CLASSIC_DATA + CAN_HEADER_LEN + 11];
    let len = frame.to_packet(&mut out).unwrap();
    assert_eq!(
        &out[..len],
        &[
            0xFF, 0x55, 0xAA, 0x00, 0x01, 0x00, 0x01, 0x00, 0x07, 0x81, 0x91, 0x00, 0x00, 0x00,
            0xAA, 0xBB, 0xC9, 0x39
        ]
    );
}

#[test]
/// FD extended frame with bit-rate switch on port 3.
fn test_fd_packet_reference() {
    let mut data = [0u8; 12];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = i as u8;
    }
    let frame = TxCanFrame::new_fd(3, ext_id(0x1ABCDE), true, &data).unwrap();
    let mut out = [0u8; 64];
    let len = frame.to_packet(&mut out).unwrap();

    let packet = parse_packet(&out[..len]).unwrap();
    assert_eq!(packet.cmd1, CMD_AP_TEST);
    assert_eq!(packet.cmd2, 3);
    assert_eq!(&packet.payload[..CAN_HEADER_LEN], &[0x01, 0x6F, 0x5E, 0x0D, 0xD0]);
    assert_eq!(&packet.payload[CAN_HEADER_LEN..], &data);
    assert_eq!(&out[len - 2..len], &[0x5A, 0x64]);
}

#[test]
fn test_data_length_limits() {
    assert!(TxCanFrame::new(0, std_id(1), &[0; 8]).is_ok());
    assert_eq!(
        TxCanFrame::new(0, std_id(1), &[0; 9]),
        Err(EncodeError::InvalidDataLength { len: 9, max: 8 })
    );
    assert!(TxCanFrame::new_fd(0, std_id(1), false, &[0; 64]).is_ok());
    assert_eq!(
        TxCanFrame::new_fd(0, std_id(1), false, &[0; 65]),
        Err(EncodeError::InvalidDataLength { len: 65, max: 64 })
    );
}

#[test]
/// Payload is header plus data; an empty message is header only.
fn test_payload_len() {
    let empty = TxCanFrame::new(0, std_id(0x10), &[]).unwrap();
    assert_eq!(empty.payload_len(), CAN_HEADER_LEN);
    let full = TxCanFrame::new_fd(0, std_id(0x10), false, &[0; 64]).unwrap();
    assert_eq!(full.payload_len(), CAN_HEADER_LEN + 64);
}

#[test]
fn test_timestamp_flag_and_brs() {
    let frame = TxCanFrame::new(2, std_id(0x123), &[])
        .unwrap()
        .with_timestamp(false);
    assert_eq!(frame.header().to_bytes(), Ok([0x80, 0x91, 0x00, 0x00, 0x00]));

    let classic = TxCanFrame::new(2, std_id(0x123), &[]).unwrap();
    assert!(!classic.brs);
    assert!(!classic.header().brs);
}

#[test]
fn test_to_packet_buffer_too_small() {
    let frame = TxCanFrame::new(1, std_id(0x123), &[0xAA, 0xBB]).unwrap();
    let mut out = [0u8; 17];
    assert_eq!(
        frame.to_packet(&mut out),
        Err(EncodeError::Packet {
            err: PacketError::BufferTooSmall {
                needed: 18,
                available: 17
            }
        })
    );
}
