//! One mailbox read carrying several packets, walked with `PacketScanner`.
mod helpers;

use axon_ipc::{
    core::{CMD_AP_SEND, CMD_AP_TEST},
    error::PacketError,
    infra::codec::traits::ToPayload,
    protocol::{
        frame::{decode_frame, Frame, FrameType},
        packet::{make_packet, PacketScanner},
        transport::{traits::ipc_channel::IpcChannel, MAX_READ_SIZE},
    },
};
use helpers::MockChannel;

fn push_delivery(stream: &mut Vec<u8>, frame: &Frame) {
    let mut inner = [0u8; 15 + 255];
    let len = frame.to_payload(&mut inner).unwrap();
    let start = stream.len();
    stream.resize(start + len + 11, 0);
    make_packet(CMD_AP_TEST, CMD_AP_SEND, &inner[..len], &mut stream[start..]).unwrap();
}

#[tokio::test]
async fn test_scan_burst_of_deliveries() {
    let (mut app, mut peer) = MockChannel::create_pair();

    let frames = [
        Frame::new(0, FrameType::CanBase, 0x100, &[1, 2, 3]).unwrap(),
        Frame::new(1, FrameType::LinRx, 0x21, &[4, 5]).unwrap(),
        Frame::new(2, FrameType::CanFdExt, 0x1234_5678, &[6; 48]).unwrap(),
    ];

    let mut burst = vec![0x00, 0x7E];
    for frame in &frames {
        push_delivery(&mut burst, frame);
    }
    // Start of a fourth packet cut by the read boundary.
    burst.extend_from_slice(&[0xFF, 0x55, 0xAA, 0x00, 0x01]);
    peer.write(&burst).await.unwrap();

    let mut buffer = [0u8; MAX_READ_SIZE];
    let read = app.read(&mut buffer).await.unwrap();
    assert_eq!(read, burst.len());

    let mut scanner = PacketScanner::new(&buffer[..read]);
    let mut decoded = Vec::new();
    for packet in scanner.by_ref() {
        let packet = packet.unwrap();
        assert!(packet.is_bus_frame_delivery());
        decoded.push(decode_frame(packet.payload).unwrap());
    }

    assert_eq!(decoded.as_slice(), &frames);
    assert_eq!(scanner.remainder(), &[0xFF, 0x55, 0xAA, 0x00, 0x01]);
}

#[tokio::test]
async fn test_scan_reports_bad_packet_and_continues() {
    let (mut app, mut peer) = MockChannel::create_pair();

    let good = Frame::new(4, FrameType::CanExt, 0x1ABCDE, &[9, 9]).unwrap();
    let mut burst = Vec::new();
    push_delivery(&mut burst, &good);
    let last = burst.len() - 1;
    burst[last] ^= 0xFF;
    push_delivery(&mut burst, &good);
    peer.write(&burst).await.unwrap();

    let mut buffer = [0u8; MAX_READ_SIZE];
    let read = app.read(&mut buffer).await.unwrap();
    let results: Vec<_> = PacketScanner::new(&buffer[..read]).collect();

    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Err(PacketError::CrcMismatch { .. })));
    let packet = results[1].unwrap();
    assert_eq!(decode_frame(packet.payload).unwrap(), good);
}
