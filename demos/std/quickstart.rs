//! Quickstart: drive the mailbox link against an in-process peer that echoes
//! every CAN message back as a received bus frame.

use axon_ipc::{
    core::{CMD_AP_SEND, CMD_AP_TEST},
    error::EncodeError,
    infra::codec::traits::{FromPayload, ToPayload},
    protocol::{
        can_header::CanHeader,
        frame::{Frame, FrameType, Protocol},
        packet::{make_packet, parse_packet},
        transport::{
            mailbox_channel::MailboxChannel,
            traits::{frame_link::FrameLink, ipc_channel::IpcChannel},
            tx_can_frame::TxCanFrame,
            MAX_READ_SIZE, MAX_TX_PACKET_SIZE,
        },
    },
};
use embedded_can::{ExtendedId, Id, StandardId};
use tokio::sync::mpsc;

/// One end of an in-memory mailbox.
struct LocalChannel {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl LocalChannel {
    fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (
            Self { tx: a_tx, rx: a_rx },
            Self { tx: b_tx, rx: b_rx },
        )
    }
}

impl IpcChannel for LocalChannel {
    type Error = &'static str;

    async fn read<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<usize, Self::Error> {
        let chunk = self.rx.recv().await.ok_or("peer gone")?;
        let len = chunk.len().min(buffer.len());
        buffer[..len].copy_from_slice(&chunk[..len]);
        Ok(len)
    }

    async fn write<'a>(&'a mut self, bytes: &'a [u8]) -> Result<usize, Self::Error> {
        self.tx.send(bytes.to_vec()).map_err(|_| "peer gone")?;
        Ok(bytes.len())
    }
}

/// Peer side: decode the transmit packet and answer with a delivery.
async fn echo_peer(mut channel: LocalChannel) {
    let mut buffer = [0u8; MAX_READ_SIZE];
    let mut scratch = [0u8; MAX_READ_SIZE];
    let mut now_us = 1_000_000u64;

    while let Ok(read) = channel.read(&mut buffer).await {
        let Ok(packet) = parse_packet(&buffer[..read]) else {
            continue;
        };
        let Ok(header) = CanHeader::from_payload(packet.payload) else {
            continue;
        };

        let frame_type = FrameType::classify(Protocol::Can, header.extended, header.fd);
        let Ok(frame) = Frame::new(packet.cmd2 as u8, frame_type, header.id, &packet.payload[5..])
        else {
            continue;
        };
        now_us += 250;
        let frame = frame.with_timestamp(now_us, 120);

        let mut inner = [0u8; MAX_READ_SIZE];
        let Ok(len) = frame.to_payload(&mut inner) else {
            continue;
        };
        let Ok(packet_len) = make_packet(CMD_AP_TEST, CMD_AP_SEND, &inner[..len], &mut scratch)
        else {
            continue;
        };
        if channel.write(&scratch[..packet_len]).await.is_err() {
            break;
        }
    }
}

/// A classic standard, a classic extended and an FD message with bit-rate switch.
fn outbound_messages() -> Result<[TxCanFrame; 3], EncodeError> {
    let classic = Id::Standard(StandardId::new(0x123).unwrap_or(StandardId::ZERO));
    let extended = Id::Extended(ExtendedId::new(0x18FE_F100).unwrap_or(ExtendedId::ZERO));
    let fd = Id::Standard(StandardId::MAX);

    Ok([
        TxCanFrame::new(1, classic, &[0xAA, 0xBB])?,
        TxCanFrame::new(2, extended, &[1, 2, 3, 4, 5, 6, 7, 8])?,
        TxCanFrame::new_fd(3, fd, true, &[0x5A; 12])?,
    ])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== axon-ipc quickstart ===\n");

    println!("Mailbox channels:");
    for channel in MailboxChannel::ALL {
        println!("  {} -> {}", channel.index(), channel);
    }
    println!();

    let (mut app, peer) = LocalChannel::pair();
    tokio::spawn(echo_peer(peer));

    let messages = outbound_messages().map_err(|err| format!("{err}"))?;

    let mut scratch = [0u8; MAX_TX_PACKET_SIZE];
    let mut buffer = [0u8; MAX_READ_SIZE];
    for message in &messages {
        let written = app
            .send_can(message, &mut scratch)
            .await
            .map_err(|err| format!("{err}"))?;
        println!("Sent {written} bytes: {:02X?}", &scratch[..written]);

        match app.recv_frame(&mut buffer).await {
            Ok(Some(frame)) => {
                println!("  {frame}");
                println!(
                    "  type={} route=0x{:08X} t={}us+{}ns\n",
                    frame.frame_type,
                    frame.route_id(),
                    frame.timestamp_us(),
                    frame.timestamp_ns
                );
            }
            Ok(None) => println!("  no frame delivered\n"),
            Err(err) => println!("  receive failed: {err}\n"),
        }
    }

    Ok(())
}
