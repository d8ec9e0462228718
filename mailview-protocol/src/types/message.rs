//! The full message structure carried by AddMessage/UpdateMessage

use serde::{Deserialize, Serialize};

use super::{Address, Chunk, Tag};

/// Signature/encryption summary for an out-of-tree chunk
///
/// Verification itself happens in the host before serialization; only the
/// pre-computed outcome crosses the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CryptoFlags {
    pub is_signed: bool,
    pub is_encrypted: bool,
}

/// A file attachment, reported outside the part tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub filename: String,
    /// Human-readable size ("4.2 KiB")
    pub size: String,
    /// Preview image as a data URI; a generic icon when no preview could
    /// be generated
    pub thumbnail: String,
    pub crypto: CryptoFlags,
    /// Chunk id, matching the Attachment element in the State table
    pub element_id: i32,
}

/// An attached MIME message, reported outside the part tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MimeMessageInfo {
    pub filename: String,
    pub size: String,
    pub crypto: CryptoFlags,
    /// Chunk id, matching the MimeMessage element in the State table
    pub element_id: i32,
}

/// Full message structure sent on AddMessage/UpdateMessage
///
/// Constructed fresh from the domain object on every send; the renderer
/// owns its copy once received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Message id as minted by the mail store
    pub mid: String,
    pub sender: Address,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    /// Short date for the collapsed header row
    pub date_pretty: String,
    /// Long date for the expanded header row
    pub date_verbose: String,
    pub subject: String,
    pub tags: Vec<Tag>,
    /// Avatar image URI; None when neither a plugin nor the remote
    /// fallback produced one
    pub gravatar: Option<String>,
    /// Plaintext preview snippet: line-break markup stripped,
    /// length-capped, markup-escaped
    pub preview: String,
    /// Message body looks like a patch
    pub patch: bool,
    /// Message file is missing from the store; body and out-of-tree
    /// lists are empty
    pub missing_content: bool,
    /// Root of the part tree; always present, possibly a placeholder
    pub root: Chunk,
    pub mime_messages: Vec<MimeMessageInfo>,
    pub attachments: Vec<AttachmentInfo>,
}
