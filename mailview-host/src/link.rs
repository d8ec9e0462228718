//! Host endpoint façade
//!
//! Ties the transport pair to the view state: every mutation of the view
//! goes through here, updates the local state and pushes the matching
//! frames to the renderer. All methods are called from the single task
//! that owns the link; failures mean the renderer is gone and the caller
//! tears the view down.

use tracing::{debug, info};

use mailview_ipc::{FrameHandler, Listener, Reader, Writer};
use mailview_protocol::messages::{self, WireMessage};
use mailview_utils::{MailviewError, Result};

use crate::collab::Collaborators;
use crate::model::MailMessage;
use crate::serialize::serialize_message;
use crate::state::ViewState;

/// Host-side frame handler
///
/// The renderer only ever sends Debug frames back; everything else it
/// could send is surfaced in the log and dropped.
struct DebugSink;

impl FrameHandler for DebugSink {
    fn on_debug(&mut self, msg: messages::Debug) {
        info!(target: "mailview::renderer", "{}", msg.msg);
    }
}

/// The host's handle on one connected renderer
pub struct RendererLink {
    writer: Writer,
    reader: Option<Reader>,
    state: ViewState,
    collab: Collaborators,
    stylesheet: Option<String>,
    renderer_ready: bool,
}

impl RendererLink {
    /// Wait for the renderer to connect on the given endpoint
    ///
    /// Consumes the listener; once this returns no further connection
    /// can be made to the endpoint.
    pub async fn accept(listener: Listener, collab: Collaborators) -> Result<Self> {
        let channel = listener.accept().await?;
        let (read, write) = channel.into_split();
        let reader = Reader::spawn(read, DebugSink);

        Ok(Self {
            writer: Writer::new(write),
            reader: Some(reader),
            state: ViewState::new(),
            collab,
            stylesheet: None,
            renderer_ready: false,
        })
    }

    pub fn view(&self) -> &ViewState {
        &self.state
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    /// Record the stylesheet to apply to the rendered view
    ///
    /// Deferred until the renderer reports its document loaded; if it
    /// already has, the sheet is pushed immediately.
    pub async fn set_stylesheet(&mut self, css: impl Into<String>) -> Result<()> {
        let css = css.into();
        if self.renderer_ready {
            self.writer
                .send(&messages::StyleSheet { css: css.clone() }.into())
                .await?;
        }
        self.stylesheet = Some(css);
        Ok(())
    }

    /// The renderer's document finished loading
    ///
    /// Flushes the deferred stylesheet; content pushed before this point
    /// would race the document parse on the renderer side.
    pub async fn renderer_loaded(&mut self) -> Result<()> {
        self.renderer_ready = true;
        if let Some(css) = self.stylesheet.clone() {
            self.writer
                .send(&messages::StyleSheet { css }.into())
                .await?;
        }
        Ok(())
    }

    /// Add a message to the view and push it to the renderer
    pub async fn add_message(&mut self, message: &MailMessage) -> Result<()> {
        let (wire, elements) = serialize_message(message, &self.collab);
        debug!(mid = %message.id, elements = elements.len(), "adding message");

        self.writer
            .send(&messages::AddMessage { message: wire }.into())
            .await?;
        self.state.insert(message.id.clone(), elements);
        self.push_state().await
    }

    /// Re-serialize a changed message and push the replacement
    ///
    /// The element table is rebuilt from scratch; the following state
    /// push invalidates every index the renderer held.
    pub async fn update_message(&mut self, message: &MailMessage) -> Result<()> {
        if !self.state.contains(&message.id) {
            return Err(MailviewError::protocol(format!(
                "update for unknown message {}",
                message.id
            )));
        }

        let (wire, elements) = serialize_message(message, &self.collab);
        debug!(mid = %message.id, elements = elements.len(), "updating message");

        self.writer
            .send(&messages::UpdateMessage { message: wire }.into())
            .await?;
        self.state.replace_elements(&message.id, elements);
        self.push_state().await
    }

    /// Drop a message from the view
    pub async fn remove_message(&mut self, mid: &str) -> Result<()> {
        self.state.remove(mid);
        self.push_state().await
    }

    /// Toggle a message's marked flag
    pub async fn set_marked(&mut self, mid: &str, marked: bool) -> Result<()> {
        let ms = self
            .state
            .get_mut(mid)
            .ok_or_else(|| MailviewError::protocol(format!("mark for unknown message {}", mid)))?;
        ms.marked = marked;

        self.writer
            .send(
                &messages::Mark {
                    mid: mid.to_string(),
                    marked,
                }
                .into(),
            )
            .await
    }

    /// Toggle a message's hidden (collapsed) flag
    pub async fn set_hidden(&mut self, mid: &str, hidden: bool) -> Result<()> {
        let ms = self
            .state
            .get_mut(mid)
            .ok_or_else(|| MailviewError::protocol(format!("hide for unknown message {}", mid)))?;
        ms.hidden = hidden;

        self.writer
            .send(
                &messages::Hidden {
                    mid: mid.to_string(),
                    hidden,
                }
                .into(),
            )
            .await
    }

    /// Toggle a message's expanded flag
    ///
    /// Expansion is part of the state table, not a dedicated frame.
    pub async fn set_expanded(&mut self, mid: &str, expanded: bool) -> Result<()> {
        let ms = self.state.get_mut(mid).ok_or_else(|| {
            MailviewError::protocol(format!("expand for unknown message {}", mid))
        })?;
        ms.expanded = expanded;
        self.push_state().await
    }

    /// Move focus to an element of a message
    ///
    /// The index is validated against the current element table before
    /// anything is sent; a stale index is an error, never a silent
    /// misfocus on the renderer side.
    pub async fn focus(&mut self, mid: &str, element: usize) -> Result<()> {
        if !self.state.focus(mid, element) {
            return Err(MailviewError::protocol(format!(
                "focus on unknown element {} of {}",
                element, mid
            )));
        }

        self.writer
            .send(
                &messages::Focus {
                    mid: mid.to_string(),
                    focus: true,
                    element: element as u32,
                }
                .into(),
            )
            .await
    }

    /// Push the full state snapshot
    pub async fn push_state(&mut self) -> Result<()> {
        self.writer
            .send(&WireMessage::State(self.state.snapshot()))
            .await
    }

    /// Tear the link down in order
    ///
    /// The Reader stops first so no handler runs against a half-closed
    /// channel, then the write side is shut.
    pub async fn shutdown(mut self) {
        if let Some(reader) = self.reader.take() {
            let status = reader.shutdown().await;
            debug!(?status, "renderer reader stopped");
        }
        self.writer.close().await;
    }
}
