//! mailview-render: renderer-side endpoint of the host protocol
//!
//! Runs inside the sandboxed web-view process. Connects back to the
//! host, drains the frame stream into an event queue and keeps the
//! document model the embedding view renders from. Nothing here touches
//! the DOM; the embedding glue drains [`HostLink`] and reads
//! [`ContentModel`].

pub mod content;
pub mod link;

pub use content::{ContentModel, RenderedMessage};
pub use link::HostLink;
