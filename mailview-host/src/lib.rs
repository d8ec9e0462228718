//! mailview-host: host-side endpoint of the renderer protocol
//!
//! Owns the mail-thread view: the domain messages handed in by the GUI,
//! the per-message interaction state, and the Writer pushing frames to
//! the sandboxed renderer. All entry points are called from the single
//! GUI-owning task; the host-side Reader only logs Debug frames.

pub mod collab;
pub mod link;
pub mod model;
pub mod serialize;
pub mod state;

pub use collab::{AvatarProvider, Collaborators, TagColorMap, ThumbnailProvider};
pub use link::RendererLink;
pub use model::{MailMessage, MimePart};
pub use serialize::serialize_message;
pub use state::{MessageViewState, ViewState};
