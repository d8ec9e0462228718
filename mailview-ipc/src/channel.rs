//! Bidirectional byte stream over a connected local socket
//!
//! The read half carries an independent cancellation handle: a token
//! cancelled from another task unblocks an in-flight read and returns
//! `Cancelled` instead of hanging until process exit.

use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;

use mailview_utils::MailviewError;

/// Channel-level error
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The cancellation token was armed while a read was in flight
    #[error("read cancelled")]
    Cancelled,

    /// The half was already closed locally
    #[error("channel closed")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChannelError {
    /// Orderly end of stream (peer closed) rather than a transport fault
    pub fn is_eof(&self) -> bool {
        matches!(self, ChannelError::Io(e) if e.kind() == ErrorKind::UnexpectedEof)
    }
}

impl From<ChannelError> for MailviewError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::Cancelled => MailviewError::Cancelled,
            ChannelError::Closed => MailviewError::ConnectionClosed,
            ChannelError::Io(e) => MailviewError::Io(e),
        }
    }
}

/// A connected channel, not yet split into its two sides
#[derive(Debug)]
pub struct Channel {
    stream: UnixStream,
    cancel: CancellationToken,
}

impl Channel {
    pub fn new(stream: UnixStream) -> Self {
        Self {
            stream,
            cancel: CancellationToken::new(),
        }
    }

    /// Handle used to unblock the read side during teardown
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Split into the Reader-owned and Writer-owned halves
    pub fn into_split(self) -> (ReadChannel, WriteChannel) {
        let (read, write) = self.stream.into_split();
        (
            ReadChannel {
                half: read,
                cancel: self.cancel,
            },
            WriteChannel { half: Some(write) },
        )
    }
}

/// Read side of a channel; owned by the Reader
pub struct ReadChannel {
    half: OwnedReadHalf,
    cancel: CancellationToken,
}

impl ReadChannel {
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fill `buf` completely or fail
    ///
    /// Returns `Cancelled` as soon as the token is armed, even mid-wait.
    /// A short read surfaces as an `UnexpectedEof` IO error; callers use
    /// [`ChannelError::is_eof`] to tell orderly closes apart from faults.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ChannelError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ChannelError::Cancelled),
            res = self.half.read_exact(buf) => {
                res?;
                Ok(())
            }
        }
    }
}

/// Write side of a channel; owned by the Writer
pub struct WriteChannel {
    half: Option<OwnedWriteHalf>,
}

impl WriteChannel {
    /// Write the whole buffer or fail; blocks only on socket backpressure
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<(), ChannelError> {
        let half = self.half.as_mut().ok_or(ChannelError::Closed)?;
        half.write_all(buf).await?;
        Ok(())
    }

    /// Close the write side; idempotent
    pub async fn close(&mut self) {
        if let Some(mut half) = self.half.take() {
            let _ = half.shutdown().await;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.half.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pair() -> (Channel, UnixStream) {
        let (a, b) = UnixStream::pair().unwrap();
        (Channel::new(a), b)
    }

    #[tokio::test]
    async fn test_read_exact_roundtrip() {
        let (chan, mut peer) = pair();
        let (mut read, _write) = chan.into_split();

        peer.write_all(b"hello").await.unwrap();

        let mut buf = [0u8; 5];
        read.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[tokio::test]
    async fn test_cancel_unblocks_pending_read() {
        let (chan, _peer) = pair();
        let token = chan.cancel_token();
        let (mut read, _write) = chan.into_split();

        let reader = tokio::spawn(async move {
            let mut buf = [0u8; 8];
            read.read_exact(&mut buf).await
        });

        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .expect("read did not unblock after cancellation")
            .unwrap();
        assert!(matches!(result, Err(ChannelError::Cancelled)));
    }

    #[tokio::test]
    async fn test_peer_close_is_eof() {
        let (chan, peer) = pair();
        let (mut read, _write) = chan.into_split();
        drop(peer);

        let mut buf = [0u8; 4];
        let err = read.read_exact(&mut buf).await.unwrap_err();
        assert!(err.is_eof());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (chan, _peer) = pair();
        let (_read, mut write) = chan.into_split();

        write.close().await;
        assert!(write.is_closed());
        write.close().await;

        let err = write.write_all(b"x").await.unwrap_err();
        assert!(matches!(err, ChannelError::Closed));
    }
}
