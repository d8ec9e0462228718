//! Domain mail model
//!
//! These are the objects the surrounding mail application feeds into the
//! serializer. Decryption, signature verification and body rendering all
//! happen upstream; by the time a part reaches this model its flags and
//! rendered content are final.

use mailview_protocol::Address;

/// One node of a message's MIME part tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimePart {
    /// Stable id within the owning message, assigned by the mail store
    pub id: i32,
    pub mime_type: String,
    /// Part has directly displayable, rendered textual content
    pub viewable: bool,
    /// Preferred alternative among siblings
    pub preferred: bool,
    /// Opaque attachment; never rendered inline
    pub attachment: bool,
    /// An embedded message/rfc822
    pub mime_message: bool,
    pub is_signed: bool,
    pub is_encrypted: bool,
    /// Rendered textual content; meaningful only when viewable
    pub content: String,
    pub filename: Option<String>,
    pub file_size: u64,
    pub children: Vec<MimePart>,
}

impl MimePart {
    /// A viewable text part
    pub fn text(id: i32, content: impl Into<String>) -> Self {
        Self {
            id,
            mime_type: "text/plain".into(),
            viewable: true,
            preferred: true,
            attachment: false,
            mime_message: false,
            is_signed: false,
            is_encrypted: false,
            content: content.into(),
            filename: None,
            file_size: 0,
            children: Vec::new(),
        }
    }

    /// A non-viewable container part (multipart/*)
    pub fn container(id: i32, mime_type: impl Into<String>, children: Vec<MimePart>) -> Self {
        Self {
            id,
            mime_type: mime_type.into(),
            viewable: false,
            preferred: false,
            attachment: false,
            mime_message: false,
            is_signed: false,
            is_encrypted: false,
            content: String::new(),
            filename: None,
            file_size: 0,
            children,
        }
    }

    /// An opaque file attachment
    pub fn file_attachment(id: i32, filename: impl Into<String>, file_size: u64) -> Self {
        Self {
            id,
            mime_type: "application/octet-stream".into(),
            viewable: false,
            preferred: false,
            attachment: true,
            mime_message: false,
            is_signed: false,
            is_encrypted: false,
            content: String::new(),
            filename: Some(filename.into()),
            file_size,
            children: Vec::new(),
        }
    }

    /// An attached MIME message
    pub fn attached_message(id: i32, filename: impl Into<String>, file_size: u64) -> Self {
        Self {
            mime_type: "message/rfc822".into(),
            mime_message: true,
            ..Self::file_attachment(id, filename, file_size)
        }
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a MimePart>, pred: &dyn Fn(&MimePart) -> bool) {
        if pred(self) {
            out.push(self);
        }
        for child in &self.children {
            child.walk(out, pred);
        }
    }
}

/// A displayed domain message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Message id as minted by the mail store
    pub id: String,
    pub sender: Address,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub date_pretty: String,
    pub date_verbose: String,
    pub subject: String,
    pub tags: Vec<String>,
    pub patch: bool,
    /// Message file missing from the store; only cached fields are valid
    pub missing_content: bool,
    pub root: MimePart,
}

impl MailMessage {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// File attachments in document order (depth-first)
    pub fn attachments(&self) -> Vec<&MimePart> {
        let mut out = Vec::new();
        self.root
            .walk(&mut out, &|p| p.attachment && !p.mime_message);
        out
    }

    /// Attached MIME messages in document order (depth-first)
    pub fn mime_messages(&self) -> Vec<&MimePart> {
        let mut out = Vec::new();
        self.root.walk(&mut out, &|p| p.mime_message);
        out
    }

    /// Concatenated rendered text of all viewable parts, depth-first,
    /// with the renderer's line-break markup between parts
    pub fn viewable_text(&self) -> String {
        let mut out = Vec::new();
        self.root.walk(&mut out, &|p| p.viewable && !p.attachment);
        out.iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// Human-readable size, binary units
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with_root(root: MimePart) -> MailMessage {
        MailMessage {
            id: "m1@example.org".into(),
            sender: Address::new("A", "a@example.org", "A <a@example.org>"),
            to: vec![],
            cc: vec![],
            bcc: vec![],
            date_pretty: "now".into(),
            date_verbose: "right now".into(),
            subject: "s".into(),
            tags: vec!["inbox".into()],
            patch: false,
            missing_content: false,
            root,
        }
    }

    #[test]
    fn test_has_tag() {
        let m = message_with_root(MimePart::text(0, "x"));
        assert!(m.has_tag("inbox"));
        assert!(!m.has_tag("unread"));
    }

    #[test]
    fn test_attachments_exclude_mime_messages() {
        let root = MimePart::container(
            0,
            "multipart/mixed",
            vec![
                MimePart::text(1, "body"),
                MimePart::file_attachment(2, "a.pdf", 10),
                MimePart::attached_message(3, "fwd.eml", 20),
            ],
        );
        let m = message_with_root(root);

        let atts: Vec<i32> = m.attachments().iter().map(|p| p.id).collect();
        assert_eq!(atts, vec![2]);

        let mimes: Vec<i32> = m.mime_messages().iter().map(|p| p.id).collect();
        assert_eq!(mimes, vec![3]);
    }

    #[test]
    fn test_viewable_text_depth_first() {
        let mut top = MimePart::text(1, "top");
        top.children.push(MimePart::text(2, "child"));
        let root = MimePart::container(0, "multipart/mixed", vec![top, MimePart::text(3, "last")]);
        let m = message_with_root(root);

        assert_eq!(m.viewable_text(), "top<br>child<br>last");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
