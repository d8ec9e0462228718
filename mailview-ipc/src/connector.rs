//! Renderer-side connection setup
//!
//! The renderer learns the rendezvous path through a one-shot,
//! out-of-band value supplied by the process-launch mechanism, modeled
//! here as a oneshot channel. It connects exactly once; there is no
//! retry, and a missing endpoint is a hard error.

use std::path::PathBuf;

use tokio::net::UnixStream;
use tokio::sync::oneshot;
use tracing::debug;

use mailview_utils::{MailviewError, Result};

use crate::channel::Channel;

/// Await the rendezvous path and connect as a client
pub async fn connect(rendezvous: oneshot::Receiver<PathBuf>) -> Result<Channel> {
    let path = rendezvous.await.map_err(|_| {
        MailviewError::connection("rendezvous channel dropped before delivering a socket path")
    })?;

    if !path.exists() {
        return Err(MailviewError::EndpointMissing { path });
    }

    let stream = UnixStream::connect(&path).await.map_err(|e| {
        MailviewError::connection(format!("failed to connect to {}: {}", path.display(), e))
    })?;

    debug!(path = %path.display(), "connected to host");

    Ok(Channel::new(stream))
}
