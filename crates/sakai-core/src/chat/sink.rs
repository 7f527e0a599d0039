//! Producer side of a chunk stream.

use tokio::sync::mpsc;

use sakai_types::chat::StreamChunk;

/// Write end of the channel feeding a [`ChunkStream`](super::relay::ChunkStream).
///
/// Sends to a consumer that went away are swallowed; closing is idempotent.
#[derive(Debug)]
pub struct ChunkSink {
    tx: Option<mpsc::Sender<StreamChunk>>,
}

impl ChunkSink {
    pub fn new(tx: mpsc::Sender<StreamChunk>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Whether the consumer still holds the stream.
    pub fn is_accepting(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Deliver one chunk, waiting for capacity. Returns `false` when the chunk
    /// could not be delivered.
    pub async fn send(&self, chunk: StreamChunk) -> bool {
        let Some(tx) = &self.tx else {
            tracing::debug!("chunk dropped: sink already closed");
            return false;
        };
        match tx.send(chunk).await {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("chunk dropped: consumer went away");
                false
            }
        }
    }

    /// Close the sink so the consumer sees end of stream.
    pub fn close(&mut self) {
        if self.tx.take().is_none() {
            tracing::debug!("chunk sink closed twice");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_and_close() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut sink = ChunkSink::new(tx);
        assert!(sink.is_accepting());
        assert!(sink.send(StreamChunk::Text("a".to_string())).await);

        sink.close();
        assert!(!sink.is_accepting());
        assert_eq!(rx.recv().await, Some(StreamChunk::Text("a".to_string())));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_send_after_consumer_dropped_is_swallowed() {
        let (tx, rx) = mpsc::channel(4);
        let sink = ChunkSink::new(tx);
        drop(rx);
        assert!(!sink.is_accepting());
        assert!(!sink.send(StreamChunk::Error("perdu".to_string())).await);
    }

    #[tokio::test]
    async fn test_double_close_is_tolerated() {
        let (tx, _rx) = mpsc::channel(1);
        let mut sink = ChunkSink::new(tx);
        sink.close();
        sink.close();
        assert!(!sink.send(StreamChunk::Text("x".to_string())).await);
    }
}
