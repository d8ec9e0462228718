//! Serialized MIME part tree

use serde::{Deserialize, Serialize};

/// A node in the serialized MIME part tree of a message
///
/// Attachments never appear in this tree: a root-level attachment is
/// replaced by an empty placeholder (the root must always exist on the
/// wire), and non-root attachments are pruned and reported separately
/// through [`super::Message::attachments`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub mime_type: String,
    /// Stable id within the owning message, assigned by the mail store
    pub id: i32,
    /// Whether this part has siblings under its parent
    pub sibling: bool,
    pub viewable: bool,
    pub preferred: bool,
    pub attachment: bool,
    pub is_signed: bool,
    pub is_encrypted: bool,
    /// Rendered textual content; empty unless directly viewable
    pub content: String,
    pub children: Vec<Chunk>,
}

impl Chunk {
    /// An empty, contentless placeholder part
    ///
    /// Used when the root of a message is itself an attachment: the root
    /// must exist on the wire even when it carries nothing.
    pub fn placeholder() -> Self {
        Self {
            mime_type: "text/plain".to_string(),
            id: -1,
            sibling: false,
            viewable: false,
            preferred: true,
            attachment: false,
            is_signed: false,
            is_encrypted: false,
            content: String::new(),
            children: Vec::new(),
        }
    }
}
