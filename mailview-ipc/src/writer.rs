//! Per-endpoint frame writer
//!
//! A synchronous send path: encode one typed message, write one complete
//! frame, report failure to the caller. There is no queue and no
//! internal lock; only the owning task calls the Writer. This is a
//! documented single-writer constraint, not an enforced invariant.

use tracing::trace;

use mailview_protocol::messages::WireMessage;
use mailview_protocol::wire::encode_frame;

use mailview_utils::{MailviewError, Result};

use crate::channel::WriteChannel;

pub struct Writer {
    channel: WriteChannel,
}

impl Writer {
    pub fn new(channel: WriteChannel) -> Self {
        Self { channel }
    }

    /// Encode and write one complete frame
    ///
    /// Blocks only on the socket write itself. A failure means the peer
    /// is gone; nothing is retried or buffered.
    pub async fn send(&mut self, msg: &WireMessage) -> Result<()> {
        let frame =
            encode_frame(msg).map_err(|e| MailviewError::Encode(e.to_string()))?;

        trace!(
            frame_type = ?msg.frame_type(),
            bytes = frame.len(),
            "sending frame"
        );

        self.channel.write_all(&frame).await?;
        Ok(())
    }

    /// Close the write side; idempotent
    pub async fn close(&mut self) {
        self.channel.close().await;
    }
}
