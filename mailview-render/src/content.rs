//! Renderer-side content model
//!
//! The pure document model the embedding web view renders from. Frames
//! are applied in arrival order; the model never answers back over the
//! wire, so applying a frame is infallible and cheap.

use std::collections::HashMap;

use tracing::warn;

use mailview_protocol::messages::WireMessage;
use mailview_protocol::types::{Element, Message};

/// One message as the renderer holds it
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    pub message: Message,
    pub marked: bool,
    pub expanded: bool,
    pub hidden: bool,
    /// Element table from the latest state snapshot
    pub elements: Vec<Element>,
}

impl RenderedMessage {
    fn new(message: Message) -> Self {
        Self {
            message,
            marked: false,
            expanded: false,
            hidden: false,
            elements: vec![Element::empty()],
        }
    }
}

/// The full document model
#[derive(Debug, Default)]
pub struct ContentModel {
    css: Option<String>,
    order: Vec<String>,
    messages: HashMap<String, RenderedMessage>,
    focused: Option<String>,
}

impl ContentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn css(&self) -> Option<&str> {
        self.css.as_deref()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, mid: &str) -> Option<&RenderedMessage> {
        self.messages.get(mid)
    }

    /// Messages in display order
    pub fn messages(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.order.iter().filter_map(|mid| self.messages.get(mid))
    }

    /// Apply one frame to the model
    ///
    /// Frames naming an unknown message are logged and dropped; the host
    /// may legitimately race a removal against its own follow-up frames.
    pub fn apply(&mut self, msg: WireMessage) {
        match msg {
            WireMessage::Debug(_) => {
                // Diagnostics flow renderer to host only
            }
            WireMessage::StyleSheet(sheet) => {
                self.css = Some(sheet.css);
            }
            WireMessage::AddMessage(add) => {
                let mid = add.message.mid.clone();
                if !self.messages.contains_key(&mid) {
                    self.order.push(mid.clone());
                }
                self.messages.insert(mid, RenderedMessage::new(add.message));
            }
            WireMessage::UpdateMessage(update) => {
                let mid = update.message.mid.clone();
                match self.messages.get_mut(&mid) {
                    Some(rm) => rm.message = update.message,
                    None => warn!(%mid, "update for unknown message"),
                }
            }
            WireMessage::State(state) => {
                // Full replacement: messages absent from the snapshot
                // leave the view, and every element table is rebuilt.
                let mut order = Vec::with_capacity(state.messages.len());
                let mut messages = HashMap::with_capacity(state.messages.len());
                for ms in state.messages {
                    let Some(mut rm) = self.messages.remove(&ms.mid) else {
                        warn!(mid = %ms.mid, "state entry for unknown message");
                        continue;
                    };
                    rm.marked = ms.marked;
                    rm.expanded = ms.expanded;
                    rm.elements = ms.elements;
                    order.push(ms.mid.clone());
                    messages.insert(ms.mid, rm);
                }
                self.order = order;
                self.messages = messages;
                self.focused = if state.focused.is_empty() {
                    None
                } else {
                    Some(state.focused)
                };
            }
            WireMessage::Mark(mark) => match self.messages.get_mut(&mark.mid) {
                Some(rm) => rm.marked = mark.marked,
                None => warn!(mid = %mark.mid, "mark for unknown message"),
            },
            WireMessage::Hidden(hidden) => match self.messages.get_mut(&hidden.mid) {
                Some(rm) => rm.hidden = hidden.hidden,
                None => warn!(mid = %hidden.mid, "hide for unknown message"),
            },
            WireMessage::Focus(focus) => {
                if !self.messages.contains_key(&focus.mid) {
                    warn!(mid = %focus.mid, "focus for unknown message");
                    return;
                }
                if focus.focus {
                    self.focused = Some(focus.mid);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailview_protocol::messages::{
        AddMessage, Focus, Hidden, Mark, MessageState, State, StyleSheet,
    };
    use mailview_protocol::types::{Address, ElementKind};

    fn wire_message(mid: &str) -> Message {
        Message {
            mid: mid.into(),
            sender: Address::new("A", "a@x", "A <a@x>"),
            to: vec![],
            cc: vec![],
            bcc: vec![],
            date_pretty: "now".into(),
            date_verbose: "right now".into(),
            subject: "s".into(),
            tags: vec![],
            gravatar: None,
            preview: "p".into(),
            patch: false,
            missing_content: false,
            root: mailview_protocol::Chunk::placeholder(),
            mime_messages: vec![],
            attachments: vec![],
        }
    }

    fn elements(ids: &[i32]) -> Vec<Element> {
        let mut out = vec![Element::empty()];
        out.extend(ids.iter().map(|&id| Element::new(ElementKind::Part, id)));
        out
    }

    fn state_for(entries: &[(&str, &[i32])], focused: &str) -> State {
        State {
            focused: focused.into(),
            messages: entries
                .iter()
                .map(|(mid, ids)| MessageState {
                    mid: (*mid).into(),
                    marked: false,
                    expanded: false,
                    elements: elements(ids),
                })
                .collect(),
        }
    }

    #[test]
    fn test_stylesheet_applies() {
        let mut model = ContentModel::new();
        model.apply(StyleSheet { css: "b{}".into() }.into());
        assert_eq!(model.css(), Some("b{}"));
    }

    #[test]
    fn test_add_message_starts_with_sentinel_table() {
        let mut model = ContentModel::new();
        model.apply(
            AddMessage {
                message: wire_message("m1@x"),
            }
            .into(),
        );

        let rm = model.get("m1@x").unwrap();
        assert_eq!(rm.elements, vec![Element::empty()]);
        assert!(!rm.marked && !rm.expanded && !rm.hidden);
    }

    #[test]
    fn test_state_replaces_element_tables() {
        let mut model = ContentModel::new();
        model.apply(
            AddMessage {
                message: wire_message("m1@x"),
            }
            .into(),
        );
        model.apply(state_for(&[("m1@x", &[1, 2])], "m1@x").into());
        assert_eq!(model.get("m1@x").unwrap().elements.len(), 3);
        assert_eq!(model.focused(), Some("m1@x"));

        // A later snapshot discards the old table entirely.
        model.apply(state_for(&[("m1@x", &[7])], "m1@x").into());
        let table = &model.get("m1@x").unwrap().elements;
        assert_eq!(table.len(), 2);
        assert_eq!(table[1].id, 7);
    }

    #[test]
    fn test_state_drops_absent_messages() {
        let mut model = ContentModel::new();
        for mid in ["a@x", "b@x"] {
            model.apply(
                AddMessage {
                    message: wire_message(mid),
                }
                .into(),
            );
        }

        model.apply(state_for(&[("b@x", &[1])], "b@x").into());
        assert_eq!(model.len(), 1);
        assert!(model.get("a@x").is_none());
        assert_eq!(model.focused(), Some("b@x"));
    }

    #[test]
    fn test_mark_hidden_focus_flags() {
        let mut model = ContentModel::new();
        model.apply(
            AddMessage {
                message: wire_message("m1@x"),
            }
            .into(),
        );

        model.apply(
            Mark {
                mid: "m1@x".into(),
                marked: true,
            }
            .into(),
        );
        model.apply(
            Hidden {
                mid: "m1@x".into(),
                hidden: true,
            }
            .into(),
        );
        model.apply(
            Focus {
                mid: "m1@x".into(),
                focus: true,
                element: 0,
            }
            .into(),
        );

        let rm = model.get("m1@x").unwrap();
        assert!(rm.marked);
        assert!(rm.hidden);
        assert_eq!(model.focused(), Some("m1@x"));
    }

    #[test]
    fn test_frames_for_unknown_messages_are_dropped() {
        let mut model = ContentModel::new();
        model.apply(
            Mark {
                mid: "ghost@x".into(),
                marked: true,
            }
            .into(),
        );
        model.apply(
            Focus {
                mid: "ghost@x".into(),
                focus: true,
                element: 1,
            }
            .into(),
        );
        assert!(model.is_empty());
        assert_eq!(model.focused(), None);
    }

    #[test]
    fn test_update_replaces_content_keeps_flags() {
        let mut model = ContentModel::new();
        model.apply(
            AddMessage {
                message: wire_message("m1@x"),
            }
            .into(),
        );
        model.apply(
            Mark {
                mid: "m1@x".into(),
                marked: true,
            }
            .into(),
        );

        let mut updated = wire_message("m1@x");
        updated.subject = "edited".into();
        model.apply(
            mailview_protocol::messages::UpdateMessage { message: updated }.into(),
        );

        let rm = model.get("m1@x").unwrap();
        assert_eq!(rm.message.subject, "edited");
        assert!(rm.marked);
    }

    #[test]
    fn test_display_order_follows_insertion() {
        let mut model = ContentModel::new();
        for mid in ["c@x", "a@x", "b@x"] {
            model.apply(
                AddMessage {
                    message: wire_message(mid),
                }
                .into(),
            );
        }

        let order: Vec<&str> = model.messages().map(|rm| rm.message.mid.as_str()).collect();
        assert_eq!(order, vec!["c@x", "a@x", "b@x"]);
    }
}
