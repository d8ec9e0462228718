//! Host/renderer message types
//!
//! One payload struct per frame tag. Payloads are bincode-encoded; the
//! frame tag, not a serialized enum discriminant, selects the type on the
//! wire so that unknown tags can be drained without a decode attempt.

use serde::{Deserialize, Serialize};

use crate::types::{Element, Message};
use crate::wire::FrameType;

/// Diagnostic text; the only renderer-to-host message in the current
/// design
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Debug {
    pub msg: String,
}

/// Initial theme push, sent once after the renderer's load-complete event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyleSheet {
    pub css: String,
}

/// Interaction state of one displayed message within a State snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageState {
    pub mid: String,
    pub marked: bool,
    pub expanded: bool,
    pub elements: Vec<Element>,
}

/// Full view-state snapshot
///
/// Always a complete replacement: the renderer must discard its previous
/// element table on receipt. Element indices are only meaningful within
/// the snapshot that carried them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct State {
    /// Message currently holding focus
    pub focused: String,
    pub messages: Vec<MessageState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mark {
    pub mid: String,
    pub marked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hidden {
    pub mid: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Focus {
    pub mid: String,
    pub focus: bool,
    /// Index into the element table of the most recent State snapshot
    pub element: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddMessage {
    pub message: Message,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateMessage {
    pub message: Message,
}

/// A decoded frame of any recognized type
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    Debug(Debug),
    StyleSheet(StyleSheet),
    State(State),
    Mark(Mark),
    Hidden(Hidden),
    Focus(Focus),
    AddMessage(AddMessage),
    UpdateMessage(UpdateMessage),
}

impl WireMessage {
    /// The frame tag this message is carried under
    pub fn frame_type(&self) -> FrameType {
        match self {
            WireMessage::Debug(_) => FrameType::Debug,
            WireMessage::StyleSheet(_) => FrameType::StyleSheet,
            WireMessage::State(_) => FrameType::State,
            WireMessage::Mark(_) => FrameType::Mark,
            WireMessage::Hidden(_) => FrameType::Hidden,
            WireMessage::Focus(_) => FrameType::Focus,
            WireMessage::AddMessage(_) => FrameType::AddMessage,
            WireMessage::UpdateMessage(_) => FrameType::UpdateMessage,
        }
    }
}

impl From<Debug> for WireMessage {
    fn from(m: Debug) -> Self {
        WireMessage::Debug(m)
    }
}

impl From<StyleSheet> for WireMessage {
    fn from(m: StyleSheet) -> Self {
        WireMessage::StyleSheet(m)
    }
}

impl From<State> for WireMessage {
    fn from(m: State) -> Self {
        WireMessage::State(m)
    }
}

impl From<Mark> for WireMessage {
    fn from(m: Mark) -> Self {
        WireMessage::Mark(m)
    }
}

impl From<Hidden> for WireMessage {
    fn from(m: Hidden) -> Self {
        WireMessage::Hidden(m)
    }
}

impl From<Focus> for WireMessage {
    fn from(m: Focus) -> Self {
        WireMessage::Focus(m)
    }
}

impl From<AddMessage> for WireMessage {
    fn from(m: AddMessage) -> Self {
        WireMessage::AddMessage(m)
    }
}

impl From<UpdateMessage> for WireMessage {
    fn from(m: UpdateMessage) -> Self {
        WireMessage::UpdateMessage(m)
    }
}
