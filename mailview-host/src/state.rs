//! Host-owned view state
//!
//! Maps each displayed message to its interaction state and ordered
//! element list. Element indices are only stable within one State push:
//! any structural change invalidates them all and requires a fresh full
//! snapshot. The element list is only ever replaced whole, never
//! patched.

use std::collections::HashMap;

use mailview_protocol::messages::{MessageState, State};
use mailview_protocol::types::Element;

/// Interaction state of one displayed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageViewState {
    pub expanded: bool,
    pub marked: bool,
    pub hidden: bool,
    /// Index into `elements`; 0 targets the message itself
    pub current_element: usize,
    pub elements: Vec<Element>,
}

impl Default for MessageViewState {
    fn default() -> Self {
        Self {
            expanded: false,
            marked: false,
            hidden: false,
            current_element: 0,
            elements: vec![Element::empty()],
        }
    }
}

/// View state for the whole displayed thread, in display order
#[derive(Debug, Default)]
pub struct ViewState {
    order: Vec<String>,
    messages: HashMap<String, MessageViewState>,
    focused: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, mid: &str) -> bool {
        self.messages.contains_key(mid)
    }

    pub fn get(&self, mid: &str) -> Option<&MessageViewState> {
        self.messages.get(mid)
    }

    pub fn get_mut(&mut self, mid: &str) -> Option<&mut MessageViewState> {
        self.messages.get_mut(mid)
    }

    /// Currently focused message id, if any
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Add a message at the end of the display order
    ///
    /// The first message added receives focus. Re-inserting a message
    /// that is already displayed only refreshes its element list;
    /// marked/expanded/hidden survive.
    pub fn insert(&mut self, mid: impl Into<String>, elements: Vec<Element>) {
        let mid = mid.into();
        if self.messages.contains_key(&mid) {
            self.replace_elements(&mid, elements);
            return;
        }

        self.order.push(mid.clone());
        self.messages.insert(
            mid.clone(),
            MessageViewState {
                elements,
                ..MessageViewState::default()
            },
        );
        if self.focused.is_none() {
            self.focused = Some(mid);
        }
    }

    /// Replace a message's element list after a structural change
    ///
    /// The current element index is clamped to the new list; the stale
    /// index may point past the end when parts disappeared.
    pub fn replace_elements(&mut self, mid: &str, elements: Vec<Element>) {
        if let Some(ms) = self.messages.get_mut(mid) {
            ms.current_element = ms.current_element.min(elements.len().saturating_sub(1));
            ms.elements = elements;
        }
    }

    /// Remove a message from the view
    pub fn remove(&mut self, mid: &str) {
        self.messages.remove(mid);
        self.order.retain(|m| m != mid);
        if self.focused.as_deref() == Some(mid) {
            self.focused = self.order.first().cloned();
        }
    }

    /// Move focus to an element of a message
    ///
    /// Returns false when the message is unknown or the index is not
    /// present in the current element table.
    pub fn focus(&mut self, mid: &str, element: usize) -> bool {
        match self.messages.get_mut(mid) {
            Some(ms) if element < ms.elements.len() => {
                ms.current_element = element;
                self.focused = Some(mid.to_string());
                true
            }
            _ => false,
        }
    }

    /// Build the full-table snapshot to push to the renderer
    ///
    /// Always complete: the renderer discards its previous table on
    /// receipt.
    pub fn snapshot(&self) -> State {
        State {
            focused: self.focused.clone().unwrap_or_default(),
            messages: self
                .order
                .iter()
                .filter_map(|mid| {
                    self.messages.get(mid).map(|ms| MessageState {
                        mid: mid.clone(),
                        marked: ms.marked,
                        expanded: ms.expanded,
                        elements: ms.elements.clone(),
                    })
                })
                .collect(),
        }
    }
}
