//! mailview-ipc: transport layer for host/renderer communication
//!
//! Connection setup (Listener/Connector), the cancellable Channel over a
//! connected Unix socket, and the Reader/Writer pair that moves frames
//! across it. Both endpoints use the same components; only the handler
//! wired into the Reader differs.

pub mod channel;
pub mod connector;
pub mod listener;
pub mod reader;
pub mod writer;

pub use channel::{Channel, ChannelError, ReadChannel, WriteChannel};
pub use connector::connect;
pub use listener::{EndpointId, Listener};
pub use reader::{FrameHandler, Reader, ReaderStatus};
pub use writer::Writer;
