//! Renderer endpoint façade
//!
//! Connects to the host's rendezvous endpoint and turns the Reader's
//! handler callbacks into an ordered event queue the render loop drains
//! at its own pace. The only traffic flowing the other way is Debug
//! diagnostics.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use mailview_ipc::{connect, FrameHandler, Reader, Writer};
use mailview_protocol::messages::{self, WireMessage};
use mailview_utils::Result;

/// Forwards every decoded frame into the event queue
///
/// Runs on the Reader task and must never block. The queue is unbounded:
/// the protocol has no acknowledgement or retransmit, so a frame lost
/// here would desync the model for the rest of the session. The only
/// way a send fails is the render loop having gone away entirely.
struct EventForwarder {
    events: mpsc::UnboundedSender<WireMessage>,
}

impl EventForwarder {
    fn forward(&mut self, msg: WireMessage) {
        if self.events.send(msg).is_err() {
            warn!("render loop gone, discarding frame");
        }
    }
}

impl FrameHandler for EventForwarder {
    fn on_style_sheet(&mut self, msg: messages::StyleSheet) {
        self.forward(msg.into());
    }
    fn on_state(&mut self, msg: messages::State) {
        self.forward(msg.into());
    }
    fn on_mark(&mut self, msg: messages::Mark) {
        self.forward(msg.into());
    }
    fn on_hidden(&mut self, msg: messages::Hidden) {
        self.forward(msg.into());
    }
    fn on_focus(&mut self, msg: messages::Focus) {
        self.forward(msg.into());
    }
    fn on_add_message(&mut self, msg: messages::AddMessage) {
        self.forward(msg.into());
    }
    fn on_update_message(&mut self, msg: messages::UpdateMessage) {
        self.forward(msg.into());
    }
}

/// The renderer's handle on its host
pub struct HostLink {
    writer: Writer,
    reader: Option<Reader>,
    events: mpsc::UnboundedReceiver<WireMessage>,
}

impl HostLink {
    /// Connect through the out-of-band rendezvous path
    pub async fn connect(rendezvous: oneshot::Receiver<PathBuf>) -> Result<Self> {
        let channel = connect(rendezvous).await?;
        let (read, write) = channel.into_split();

        let (tx, rx) = mpsc::unbounded_channel();
        let reader = Reader::spawn(read, EventForwarder { events: tx });

        Ok(Self {
            writer: Writer::new(write),
            reader: Some(reader),
            events: rx,
        })
    }

    /// Next frame in arrival order; None once the host is gone and the
    /// queue has drained
    pub async fn recv(&mut self) -> Option<WireMessage> {
        self.events.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv)
    pub fn try_recv(&mut self) -> Option<WireMessage> {
        self.events.try_recv().ok()
    }

    /// Send a diagnostic line to the host
    pub async fn debug(&mut self, msg: impl Into<String>) -> Result<()> {
        self.writer
            .send(&messages::Debug { msg: msg.into() }.into())
            .await
    }

    /// Tear the link down in order: Reader first, then the write side
    pub async fn shutdown(mut self) {
        if let Some(reader) = self.reader.take() {
            reader.shutdown().await;
        }
        self.writer.close().await;
    }
}
