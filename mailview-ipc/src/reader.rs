//! Per-endpoint frame reader
//!
//! A dedicated task that blocks on channel reads, decodes frames and
//! dispatches them to per-type handler methods. All transport errors are
//! terminal for the connection; the Reader owns no retry logic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, trace, warn};

use mailview_protocol::messages::{
    AddMessage, Debug, Focus, Hidden, Mark, State, StyleSheet, UpdateMessage, WireMessage,
};
use mailview_protocol::wire::{self, Decoded, LENGTH_SIZE, MAX_PAYLOAD_SIZE, TAG_SIZE};

use crate::channel::{ChannelError, ReadChannel};

/// Terminal state of a Reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderStatus {
    /// Peer closed the stream in an orderly fashion between frames
    Clean,
    /// Transport fault or desynchronized stream
    Error,
    /// Cancellation token armed during teardown
    Cancelled,
}

/// Per-type handlers for decoded frames
///
/// All methods default to no-ops; an endpoint implements only the types
/// it consumes. Handlers run on the Reader task and must hand any shared
/// state mutation back to the owning context themselves.
pub trait FrameHandler: Send {
    fn on_debug(&mut self, _msg: Debug) {}
    fn on_style_sheet(&mut self, _msg: StyleSheet) {}
    fn on_state(&mut self, _msg: State) {}
    fn on_mark(&mut self, _msg: Mark) {}
    fn on_hidden(&mut self, _msg: Hidden) {}
    fn on_focus(&mut self, _msg: Focus) {}
    fn on_add_message(&mut self, _msg: AddMessage) {}
    fn on_update_message(&mut self, _msg: UpdateMessage) {}
}

fn dispatch<H: FrameHandler>(handler: &mut H, msg: WireMessage) {
    match msg {
        WireMessage::Debug(m) => handler.on_debug(m),
        WireMessage::StyleSheet(m) => handler.on_style_sheet(m),
        WireMessage::State(m) => handler.on_state(m),
        WireMessage::Mark(m) => handler.on_mark(m),
        WireMessage::Hidden(m) => handler.on_hidden(m),
        WireMessage::Focus(m) => handler.on_focus(m),
        WireMessage::AddMessage(m) => handler.on_add_message(m),
        WireMessage::UpdateMessage(m) => handler.on_update_message(m),
    }
}

/// Handle to a running Reader task
pub struct Reader {
    handle: JoinHandle<ReaderStatus>,
    cancel: CancellationToken,
    running: Arc<AtomicBool>,
}

impl Reader {
    /// Spawn the read loop on a dedicated task
    pub fn spawn<H>(channel: ReadChannel, handler: H) -> Self
    where
        H: FrameHandler + 'static,
    {
        let cancel = channel.cancel_token();
        let running = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(read_loop(channel, handler, Arc::clone(&running)));

        Self {
            handle,
            cancel,
            running,
        }
    }

    /// Stop the Reader and wait for it to finish
    ///
    /// Ordering matters: first clear the running flag so the loop will
    /// not re-enter after its current read returns, then arm the token
    /// to unblock the read in progress, then join. Cancellation
    /// guarantees the join is bounded.
    pub async fn shutdown(self) -> ReaderStatus {
        self.running.store(false, Ordering::Release);
        self.cancel.cancel();
        self.join().await
    }

    /// Wait for the Reader to reach a terminal state on its own
    pub async fn join(self) -> ReaderStatus {
        self.handle.await.unwrap_or_else(|e| {
            error!("reader task panicked: {}", e);
            ReaderStatus::Error
        })
    }
}

async fn read_loop<H>(
    mut channel: ReadChannel,
    mut handler: H,
    running: Arc<AtomicBool>,
) -> ReaderStatus
where
    H: FrameHandler,
{
    let cancel = channel.cancel_token();

    while running.load(Ordering::Acquire) {
        // Length word first. A short read here means the peer closed the
        // stream between frames; that is the one orderly way out.
        let mut len_buf = [0u8; LENGTH_SIZE];
        match channel.read_exact(&mut len_buf).await {
            Ok(()) => {}
            Err(ChannelError::Cancelled) => return ReaderStatus::Cancelled,
            Err(e) if e.is_eof() => return ReaderStatus::Clean,
            Err(e) => {
                warn!("transport error reading frame length: {}", e);
                return ReaderStatus::Error;
            }
        }
        let length = u64::from_ne_bytes(len_buf) as usize;

        // From here on the stream is mid-frame: any short read leaves it
        // desynchronized and tears the connection down.
        let mut tag_buf = [0u8; TAG_SIZE];
        match channel.read_exact(&mut tag_buf).await {
            Ok(()) => {}
            Err(ChannelError::Cancelled) => return ReaderStatus::Cancelled,
            Err(e) => {
                warn!("transport error reading frame tag: {}", e);
                return ReaderStatus::Error;
            }
        }
        let raw_tag = u32::from_ne_bytes(tag_buf);

        if length > MAX_PAYLOAD_SIZE {
            warn!(
                length,
                raw_tag, "declared payload length exceeds frame cap, stream desynchronized"
            );
            return ReaderStatus::Error;
        }

        // The payload must be drained even for unknown tags to keep the
        // stream framed correctly.
        let mut payload = vec![0u8; length];
        match channel.read_exact(&mut payload).await {
            Ok(()) => {}
            Err(ChannelError::Cancelled) => return ReaderStatus::Cancelled,
            Err(e) => {
                warn!("transport error reading {} payload bytes: {}", length, e);
                return ReaderStatus::Error;
            }
        }

        match wire::decode_payload(raw_tag, &payload) {
            Ok(Decoded::Frame(msg)) => dispatch(&mut handler, msg),
            Ok(Decoded::Ignored) => trace!(raw_tag, "discarding frame with unknown tag"),
            // A malformed-but-recognized frame does not tear down the
            // connection; the stream itself is still framed correctly.
            Err(e) => warn!("skipping malformed frame: {}", e),
        }
    }

    // Shutdown clears the running flag before arming the token, so the
    // loop may exit through the flag without a read ever observing the
    // cancellation. An armed token still means this was a teardown, not
    // an orderly peer close.
    if cancel.is_cancelled() {
        ReaderStatus::Cancelled
    } else {
        ReaderStatus::Clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;
    use tokio::net::UnixStream;

    use mailview_protocol::wire::{encode_frame, FrameHeader};

    use crate::channel::Channel;
    use crate::writer::Writer;

    /// Handler collecting every dispatched frame
    #[derive(Clone, Default)]
    struct Collector {
        seen: Arc<Mutex<Vec<WireMessage>>>,
    }

    impl Collector {
        fn take(&self) -> Vec<WireMessage> {
            std::mem::take(&mut self.seen.lock().unwrap())
        }
    }

    impl FrameHandler for Collector {
        fn on_debug(&mut self, msg: Debug) {
            self.seen.lock().unwrap().push(msg.into());
        }
        fn on_style_sheet(&mut self, msg: StyleSheet) {
            self.seen.lock().unwrap().push(msg.into());
        }
        fn on_mark(&mut self, msg: Mark) {
            self.seen.lock().unwrap().push(msg.into());
        }
        fn on_hidden(&mut self, msg: Hidden) {
            self.seen.lock().unwrap().push(msg.into());
        }
    }

    fn endpoints() -> (ReadChannel, Writer) {
        let (a, b) = UnixStream::pair().unwrap();
        let (read, _write) = Channel::new(a).into_split();
        let (_peer_read, peer_write) = Channel::new(b).into_split();
        (read, Writer::new(peer_write))
    }

    #[tokio::test]
    async fn test_frames_dispatch_in_send_order() {
        let (read, mut writer) = endpoints();
        let collector = Collector::default();
        let reader = Reader::spawn(read, collector.clone());

        let first = WireMessage::Mark(Mark {
            mid: "a@x".into(),
            marked: true,
        });
        let second = WireMessage::Hidden(Hidden {
            mid: "a@x".into(),
            hidden: false,
        });

        writer.send(&first).await.unwrap();
        writer.send(&second).await.unwrap();
        writer.close().await;

        let status = tokio::time::timeout(Duration::from_secs(1), reader.join())
            .await
            .unwrap();
        assert_eq!(status, ReaderStatus::Clean);
        assert_eq!(collector.take(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_peer_close_between_frames_is_clean() {
        let (read, mut writer) = endpoints();
        let reader = Reader::spawn(read, Collector::default());

        writer
            .send(&WireMessage::Debug(Debug { msg: "bye".into() }))
            .await
            .unwrap();
        writer.close().await;

        assert_eq!(reader.join().await, ReaderStatus::Clean);
    }

    #[tokio::test]
    async fn test_cancellation_unblocks_within_bounded_time() {
        let (read, _writer) = endpoints();
        let reader = Reader::spawn(read, Collector::default());

        // No bytes ever arrive; shutdown must still complete promptly.
        let status = tokio::time::timeout(Duration::from_secs(1), reader.shutdown())
            .await
            .expect("reader did not stop after cancellation");
        assert_eq!(status, ReaderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_read_is_cancelled() {
        let (read, _writer) = endpoints();
        let reader = Reader::spawn(read, Collector::default());

        // On a current-thread runtime the spawned task has not been
        // polled yet, so the loop exits through the cleared running flag
        // without ever entering a read. That exit still reports the
        // teardown, not an orderly close.
        let status = reader.shutdown().await;
        assert_eq!(status, ReaderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_truncated_payload_is_transport_error() {
        let (a, b) = UnixStream::pair().unwrap();
        let (read, _write) = Channel::new(a).into_split();
        let reader = Reader::spawn(read, Collector::default());

        let frame = encode_frame(&WireMessage::Debug(Debug {
            msg: "will be cut short".into(),
        }))
        .unwrap();

        let mut peer = b;
        // Header promises more payload bytes than will ever arrive.
        peer.write_all(&frame[..frame.len() - 4]).await.unwrap();
        peer.shutdown().await.unwrap();

        let status = tokio::time::timeout(Duration::from_secs(1), reader.join())
            .await
            .expect("reader hung on truncated payload");
        assert_eq!(status, ReaderStatus::Error);
    }

    #[tokio::test]
    async fn test_oversized_declared_length_is_transport_error() {
        let (a, b) = UnixStream::pair().unwrap();
        let (read, _write) = Channel::new(a).into_split();
        let reader = Reader::spawn(read, Collector::default());

        let header = FrameHeader::new((MAX_PAYLOAD_SIZE + 1) as u64, 0);
        let mut peer = b;
        peer.write_all(&header.encode()).await.unwrap();

        assert_eq!(reader.join().await, ReaderStatus::Error);
    }

    #[tokio::test]
    async fn test_unknown_tag_is_drained_and_skipped() {
        let (a, b) = UnixStream::pair().unwrap();
        let (read, _write) = Channel::new(a).into_split();
        let collector = Collector::default();
        let reader = Reader::spawn(read, collector.clone());

        // A frame from a future protocol version, then a known frame.
        let header = FrameHeader::new(6, 900);
        let mut peer = b;
        peer.write_all(&header.encode()).await.unwrap();
        peer.write_all(b"future").await.unwrap();

        let known = WireMessage::Debug(Debug {
            msg: "still here".into(),
        });
        peer.write_all(&encode_frame(&known).unwrap()).await.unwrap();
        peer.shutdown().await.unwrap();

        assert_eq!(reader.join().await, ReaderStatus::Clean);
        assert_eq!(collector.take(), vec![known]);
    }

    #[tokio::test]
    async fn test_malformed_known_frame_is_skipped() {
        let (a, b) = UnixStream::pair().unwrap();
        let (read, _write) = Channel::new(a).into_split();
        let collector = Collector::default();
        let reader = Reader::spawn(read, collector.clone());

        // Garbage payload under a known tag: logged and skipped, the
        // connection survives.
        let garbage = [0xffu8; 3];
        let header = FrameHeader::new(garbage.len() as u64, 3);
        let mut peer = b;
        peer.write_all(&header.encode()).await.unwrap();
        peer.write_all(&garbage).await.unwrap();

        let known = WireMessage::Mark(Mark {
            mid: "a@x".into(),
            marked: true,
        });
        peer.write_all(&encode_frame(&known).unwrap()).await.unwrap();
        peer.shutdown().await.unwrap();

        assert_eq!(reader.join().await, ReaderStatus::Clean);
        assert_eq!(collector.take(), vec![known]);
    }
}
