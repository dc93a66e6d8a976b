//! In-memory message channel over tokio `mpsc`.
//!
//! Stands in for a frame's message channel in the demo runtime and in
//! tests. Each endpoint can both post and receive.

use super::{MessagePort, MessageSource, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

/// One side of an in-memory duplex channel
#[derive(Debug)]
pub struct MemoryEndpoint {
    outbound: mpsc::Sender<Value>,
    inbound: Mutex<mpsc::Receiver<Value>>,
}

/// Create a connected pair of endpoints: `(frame side, host side)`.
///
/// Whatever one side posts, the other receives, in order.
pub fn duplex(buffer: usize) -> (MemoryEndpoint, MemoryEndpoint) {
    let (frame_tx, host_rx) = mpsc::channel(buffer);
    let (host_tx, frame_rx) = mpsc::channel(buffer);

    let frame = MemoryEndpoint {
        outbound: frame_tx,
        inbound: Mutex::new(frame_rx),
    };
    let host = MemoryEndpoint {
        outbound: host_tx,
        inbound: Mutex::new(host_rx),
    };
    (frame, host)
}

#[async_trait]
impl MessagePort for MemoryEndpoint {
    async fn post_message(&self, message: Value) -> Result<(), TransportError> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| TransportError::Closed)
    }
}

#[async_trait]
impl MessageSource for MemoryEndpoint {
    async fn next_message(&self) -> Result<Value, TransportError> {
        let mut inbound = self.inbound.lock().await;
        inbound.recv().await.ok_or(TransportError::Closed)
    }
}
