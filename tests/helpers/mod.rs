/// Test doubles to simulate the mailbox channel during integration tests.
use axon_ipc::protocol::transport::traits::ipc_channel::IpcChannel;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory mailbox reproducing the `IpcChannel` behavior: every write is
/// delivered as one chunk, every read returns at most one chunk.
pub struct MockChannel {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Vec<u8>>>>,
}

#[allow(dead_code)]
impl MockChannel {
    /// Construct a pair of interconnected endpoints (application ↔ peer core).
    pub fn create_pair() -> (Self, Self) {
        let (app_tx, peer_rx) = mpsc::unbounded_channel();
        let (peer_tx, app_rx) = mpsc::unbounded_channel();

        let app = Self {
            tx: app_tx,
            rx: Arc::new(Mutex::new(app_rx)),
        };

        let peer = Self {
            tx: peer_tx,
            rx: Arc::new(Mutex::new(peer_rx)),
        };

        (app, peer)
    }
}

impl IpcChannel for MockChannel {
    type Error = ();

    async fn read<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<usize, Self::Error> {
        let mut rx = self.rx.lock().await;
        let chunk = rx.recv().await.ok_or(())?;
        let len = chunk.len().min(buffer.len());
        buffer[..len].copy_from_slice(&chunk[..len]);
        Ok(len)
    }

    async fn write<'a>(&'a mut self, bytes: &'a [u8]) -> Result<usize, Self::Error> {
        self.tx.send(bytes.to_vec()).map_err(|_| ())?;
        Ok(bytes.len())
    }
}

#[allow(dead_code)]
/// Channel whose writes stop after `limit` bytes, like a full mailbox FIFO.
pub struct ShortChannel {
    pub inner: MockChannel,
    pub limit: usize,
}

impl IpcChannel for ShortChannel {
    type Error = ();

    async fn read<'a>(&'a mut self, buffer: &'a mut [u8]) -> Result<usize, Self::Error> {
        self.inner.read(buffer).await
    }

    async fn write<'a>(&'a mut self, bytes: &'a [u8]) -> Result<usize, Self::Error> {
        let len = bytes.len().min(self.limit);
        self.inner.write(&bytes[..len]).await
    }
}

#[allow(dead_code)]
/// Channel with nothing to read and a dead write side.
pub struct IdleChannel;

impl IpcChannel for IdleChannel {
    type Error = &'static str;

    async fn read<'a>(&'a mut self, _buffer: &'a mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    async fn write<'a>(&'a mut self, _bytes: &'a [u8]) -> Result<usize, Self::Error> {
        Err("mailbox closed")
    }
}
