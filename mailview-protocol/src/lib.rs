//! mailview-protocol: Wire definitions for host/renderer communication
//!
//! This crate defines the frame layout, the closed set of message type
//! tags and all payload structures exchanged between the mailview host
//! process and the sandboxed renderer over a Unix socket.

pub mod messages;
pub mod types;
pub mod wire;

// Re-export main types at crate root
pub use messages::{
    AddMessage, Debug, Focus, Hidden, Mark, MessageState, State, StyleSheet, UpdateMessage,
    WireMessage,
};
pub use types::{
    Address, AttachmentInfo, Chunk, CryptoFlags, Element, ElementKind, Message, MimeMessageInfo,
    Tag,
};
pub use wire::{decode_payload, encode_frame, Decoded, FrameHeader, FrameType, WireError};

/// Current protocol version
pub const PROTOCOL_VERSION: u32 = 1;
