//! Host-side rendezvous endpoint
//!
//! Each host instance mints a unique socket path under the runtime
//! directory and accepts exactly one inbound connection. The path is
//! unlinked as soon as the connection is accepted (or the listener is
//! dropped), so a second client finds no endpoint to connect to.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::UnixListener;
use tracing::debug;

use mailview_utils::{paths, MailviewError, Result};

use crate::channel::Channel;

/// Length of the random rendezvous-name suffix
const SUFFIX_LEN: usize = 30;

/// Process-wide instance counter; this factory owns the only mutable
/// naming state in the process
static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identity of one rendezvous endpoint
///
/// Combines a per-process instance number (multiple viewer instances may
/// be open concurrently) with a random alphanumeric suffix (prevents
/// path guessing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointId {
    pub instance: u64,
    pub suffix: String,
}

impl EndpointId {
    /// Mint the next unique identity
    pub fn next() -> Self {
        Self {
            instance: INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed) + 1,
            suffix: random_alphanumeric(SUFFIX_LEN),
        }
    }

    /// Socket file name: `mailview.<instance>.<suffix>`
    pub fn socket_name(&self) -> String {
        format!("mailview.{}.{}", self.instance, self.suffix)
    }
}

fn random_alphanumeric(len: usize) -> String {
    std::iter::repeat_with(fastrand::alphanumeric).take(len).collect()
}

/// One-shot listener on a uniquely named local socket
pub struct Listener {
    inner: UnixListener,
    path: PathBuf,
}

impl Listener {
    /// Bind a fresh endpoint under the runtime sockets directory
    pub fn bind() -> Result<Self> {
        Self::bind_in(&paths::sockets_dir())
    }

    /// Bind a fresh endpoint under an explicit directory
    pub fn bind_in(dir: &Path) -> Result<Self> {
        let id = EndpointId::next();

        std::fs::create_dir_all(dir)?;
        // Restrict the whole directory to the owning user before any
        // socket appears in it
        std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;

        let path = dir.join(id.socket_name());
        let inner = UnixListener::bind(&path).map_err(|e| {
            MailviewError::connection(format!("failed to bind {}: {}", path.display(), e))
        })?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;

        debug!(path = %path.display(), "listening for renderer");

        Ok(Self { inner, path })
    }

    /// The rendezvous path to hand to the renderer process out-of-band
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept exactly one connection
    ///
    /// Consumes the listener; the socket path is unlinked on return, so
    /// the design's single-connection constraint holds by construction.
    pub async fn accept(self) -> Result<Channel> {
        let (stream, _addr) = self.inner.accept().await?;
        debug!(path = %self.path.display(), "renderer connected");
        Ok(Channel::new(stream))
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
