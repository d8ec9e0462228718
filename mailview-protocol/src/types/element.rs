//! Interactive element addressing
//!
//! An element is a focusable/selectable unit within a displayed message:
//! a viewable part, a file attachment or an embedded MIME message. Index 0
//! of every message's element list is the `Empty` sentinel, meaning "no
//! sub-element selected, the message itself is the target".

use serde::{Deserialize, Serialize};

/// Kind of interactive element within a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ElementKind {
    /// Sentinel occupying index 0 of every element list
    Empty,
    /// A viewable body part
    Part,
    /// A file attachment
    Attachment,
    /// An attached MIME message
    MimeMessage,
}

/// One entry in a message's ordered element list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    /// Stable chunk id within the owning message; -1 for the sentinel
    pub id: i32,
}

impl Element {
    pub fn new(kind: ElementKind, id: i32) -> Self {
        Self { kind, id }
    }

    /// The sentinel element at index 0
    pub fn empty() -> Self {
        Self::new(ElementKind::Empty, -1)
    }

    /// Identifier for the renderer's corresponding display node
    pub fn display_id(&self) -> String {
        match self.kind {
            ElementKind::Empty => "".to_string(),
            ElementKind::Part => format!("part_{}", self.id),
            ElementKind::Attachment => format!("attachment_{}", self.id),
            ElementKind::MimeMessage => format!("mime_message_{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sentinel() {
        let e = Element::empty();
        assert_eq!(e.kind, ElementKind::Empty);
        assert_eq!(e.id, -1);
        assert_eq!(e.display_id(), "");
    }

    #[test]
    fn test_display_id() {
        assert_eq!(
            Element::new(ElementKind::Part, 3).display_id(),
            "part_3"
        );
        assert_eq!(
            Element::new(ElementKind::Attachment, 7).display_id(),
            "attachment_7"
        );
        assert_eq!(
            Element::new(ElementKind::MimeMessage, 2).display_id(),
            "mime_message_2"
        );
    }
}
