//! Domain message to wire message serialization
//!
//! A pure transform: the same domain object always yields the same wire
//! message and the same element list. The element list is built by the
//! single traversal that also builds the Chunk tree, so the state
//! synchronizer and the serialized tree agree on element indices within
//! one snapshot by construction.

use mailview_protocol::types::{
    AttachmentInfo, Chunk, CryptoFlags, Element, ElementKind, Message, MimeMessageInfo, Tag,
};

use crate::collab::{self, Collaborators};
use crate::model::{format_size, MailMessage, MimePart};

/// Preview snippet length cap, in characters
pub const MAX_PREVIEW_LEN: usize = 80;

/// Avatar image size requested from providers
const AVATAR_SIZE: u32 = 48;

/// Serialize a domain message for AddMessage/UpdateMessage
///
/// Returns the wire message together with the message's ordered element
/// list: index 0 is the Empty sentinel, then viewable body parts in
/// traversal order, then attached MIME messages, then file attachments.
pub fn serialize_message(m: &MailMessage, collab: &Collaborators) -> (Message, Vec<Element>) {
    let mut elements = vec![Element::empty()];

    let root = build_root(&m.root, &mut elements);

    let mut mime_messages = Vec::new();
    let mut attachments = Vec::new();

    if !m.missing_content {
        for part in m.mime_messages() {
            elements.push(Element::new(ElementKind::MimeMessage, part.id));
            mime_messages.push(MimeMessageInfo {
                filename: part.filename.clone().unwrap_or_default(),
                size: format_size(part.file_size),
                crypto: CryptoFlags {
                    is_signed: part.is_signed,
                    is_encrypted: part.is_encrypted,
                },
                element_id: part.id,
            });
        }

        for part in m.attachments() {
            elements.push(Element::new(ElementKind::Attachment, part.id));
            attachments.push(AttachmentInfo {
                filename: part.filename.clone().unwrap_or_default(),
                size: format_size(part.file_size),
                thumbnail: collab
                    .thumbnails
                    .thumbnail(part)
                    .unwrap_or_else(|| collab::FALLBACK_ATTACHMENT_ICON.to_string()),
                crypto: CryptoFlags {
                    is_signed: part.is_signed,
                    is_encrypted: part.is_encrypted,
                },
                element_id: part.id,
            });
        }
    }

    let tags = m
        .tags
        .iter()
        .map(|tag| {
            let (fg, bg) = collab.tag_colors.colors(tag);
            Tag {
                tag: tag.clone(),
                fg,
                bg,
            }
        })
        .collect();

    let gravatar = collab
        .avatars
        .avatar_uri(&m.sender.email, AVATAR_SIZE)
        .or_else(|| {
            collab
                .enable_gravatar
                .then(|| collab::gravatar_uri(&m.sender.email, AVATAR_SIZE))
        });

    let message = Message {
        mid: m.id.clone(),
        sender: m.sender.clone(),
        to: m.to.clone(),
        cc: m.cc.clone(),
        bcc: m.bcc.clone(),
        date_pretty: m.date_pretty.clone(),
        date_verbose: m.date_verbose.clone(),
        subject: m.subject.clone(),
        tags,
        gravatar,
        preview: make_preview(&m.viewable_text()),
        patch: m.patch,
        missing_content: m.missing_content,
        root,
        mime_messages,
        attachments,
    };

    (message, elements)
}

/// Result of serializing one part subtree
enum Built {
    One(Chunk),
    /// Non-viewable wrapper flattened into its children
    Many(Vec<Chunk>),
    /// Attachment subtree, pruned from the tree
    Pruned,
}

fn build_root(part: &MimePart, elements: &mut Vec<Element>) -> Chunk {
    match build_part(part, true, false, elements) {
        Built::One(chunk) => chunk,
        Built::Many(mut chunks) if chunks.len() == 1 => chunks.remove(0),
        Built::Many(chunks) => {
            // The root flattened into several parts; the wire root must
            // still be a single chunk.
            let mut root = Chunk::placeholder();
            root.children = chunks;
            root
        }
        // Root attachments are handled inside build_part
        Built::Pruned => Chunk::placeholder(),
    }
}

fn build_part(part: &MimePart, root: bool, sibling: bool, elements: &mut Vec<Element>) -> Built {
    if part.attachment || part.mime_message {
        // Should not happen on the root part, but a broken message may
        // be constructed that way: the root must exist on the wire
        // regardless, so emit an empty placeholder. Anywhere else the
        // subtree is pruned; attachments are reported separately.
        if root {
            return Built::One(Chunk::placeholder());
        }
        return Built::Pruned;
    }

    let mut chunk = Chunk {
        mime_type: "text/plain".to_string(),
        id: part.id,
        sibling,
        viewable: false,
        preferred: true,
        attachment: false,
        is_signed: false,
        is_encrypted: false,
        content: String::new(),
        children: Vec::new(),
    };

    if part.viewable {
        chunk.mime_type = part.mime_type.clone();
        chunk.preferred = part.preferred;
        chunk.is_signed = part.is_signed;
        chunk.is_encrypted = part.is_encrypted;
        chunk.viewable = true;
        chunk.content = strip_line_break_markup(&part.content);

        elements.push(Element::new(ElementKind::Part, part.id));
    }

    // Recurse into children after the part itself so element order
    // matches display order.
    let child_sibling = part.children.len() > 1;
    let mut children = Vec::new();
    for kid in &part.children {
        match build_part(kid, false, child_sibling, elements) {
            Built::One(c) => children.push(c),
            Built::Many(cs) => children.extend(cs),
            Built::Pruned => {}
        }
    }

    if chunk.viewable {
        chunk.children = children;
        Built::One(chunk)
    } else {
        // Flatten empty wrappers into their children
        Built::Many(children)
    }
}

/// Strip the renderer's line-break markup, replacing it with plain
/// whitespace
fn strip_line_break_markup(text: &str) -> String {
    text.replace("<br />", " ")
        .replace("<br/>", " ")
        .replace("<br>", " ")
}

fn make_preview(text: &str) -> String {
    let stripped = strip_line_break_markup(text);

    let capped = if stripped.chars().count() > MAX_PREVIEW_LEN {
        let cut: String = stripped.chars().take(MAX_PREVIEW_LEN - 3).collect();
        format!("{}...", cut)
    } else {
        stripped
    };

    html_escape::encode_text(&capped).into_owned()
}
