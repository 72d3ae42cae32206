use crate::{BroadcastError, Result as BroadcastResult};

use std::convert::Infallible;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;

/// Where a session writes its encoded frames.
///
/// A `BroadcastError::Transport` from `send_frame` means the client is gone;
/// any other error is unexpected.
#[async_trait]
pub trait FrameSink: Send {
    async fn send_frame(&mut self, frame: Bytes) -> BroadcastResult<()>;

    /// Resolves once the client side is gone. Sinks that cannot tell never resolve.
    async fn closed(&mut self) {
        std::future::pending::<()>().await
    }
}

/// Sink feeding an HTTP response body through a bounded channel
pub struct ChannelFrameSink {
    tx: mpsc::Sender<Bytes>,
}

/// Receiving half of a `ChannelFrameSink`; becomes the response body
pub struct FrameReceiver {
    rx: mpsc::Receiver<Bytes>,
}

/// Create a connected sink/receiver pair buffering at most `buffer` frames.
pub fn channel(buffer: usize) -> (ChannelFrameSink, FrameReceiver) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (ChannelFrameSink { tx }, FrameReceiver { rx })
}

#[async_trait]
impl FrameSink for ChannelFrameSink {
    async fn send_frame(&mut self, frame: Bytes) -> BroadcastResult<()> {
        // The receiver is dropped when the HTTP layer abandons the body.
        self.tx.send(frame).await.map_err(|_| {
            BroadcastError::transport(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "response body dropped by client connection",
            ))
        })
    }

    async fn closed(&mut self) {
        self.tx.closed().await
    }
}

impl FrameReceiver {
    /// Body stream that ends when the sending session finishes.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
        futures::stream::unfold(self.rx, |mut rx| async move {
            let frame = rx.recv().await?;
            Some((Ok(frame), rx))
        })
    }
}
