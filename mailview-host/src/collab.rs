//! External collaborator seams
//!
//! Tag colors, avatars and attachment thumbnails come from the
//! surrounding application (its theme, its plugin manager, its icon
//! loader). The serializer talks to them through these traits so the
//! protocol layer never depends on GUI machinery.

use crate::model::MimePart;

/// Resolves a tag name to literal foreground/background colors
pub trait TagColorMap: Send + Sync {
    fn colors(&self, tag: &str) -> (String, String);
}

/// Plugin-style avatar lookup
pub trait AvatarProvider: Send + Sync {
    /// An avatar URI for the sender, or None to fall through
    fn avatar_uri(&self, email: &str, size: u32) -> Option<String>;
}

/// Produces a preview image for an attachment
pub trait ThumbnailProvider: Send + Sync {
    /// A thumbnail data URI, or None when the content could not be
    /// decoded; the serializer substitutes a generic icon then
    fn thumbnail(&self, part: &MimePart) -> Option<String>;
}

/// Collaborator bundle handed to the serializer
pub struct Collaborators {
    pub tag_colors: Box<dyn TagColorMap>,
    pub avatars: Box<dyn AvatarProvider>,
    pub thumbnails: Box<dyn ThumbnailProvider>,
    /// Allow falling back to the remote avatar service when no plugin
    /// answers
    pub enable_gravatar: bool,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            tag_colors: Box::new(DerivedTagColors),
            avatars: Box::new(NoAvatars),
            thumbnails: Box::new(NoThumbnails),
            enable_gravatar: false,
        }
    }
}

/// Stable colors derived from the tag name, against a white background
///
/// Stand-in for the application's configurable tag color map; same tag,
/// same colors, across runs.
pub struct DerivedTagColors;

impl TagColorMap for DerivedTagColors {
    fn colors(&self, tag: &str) -> (String, String) {
        let mut hash: u32 = 2166136261;
        for b in tag.bytes() {
            hash ^= b as u32;
            hash = hash.wrapping_mul(16777619);
        }

        let r = ((hash >> 16) & 0xff) as u8;
        let g = ((hash >> 8) & 0xff) as u8;
        let b = (hash & 0xff) as u8;

        // Perceived luminance decides the text color
        let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        let fg = if luminance > 128.0 { "#000000" } else { "#ffffff" };

        (fg.to_string(), format!("#{:02x}{:02x}{:02x}", r, g, b))
    }
}

/// Provider that never answers; gravatar fallback (if enabled) applies
pub struct NoAvatars;

impl AvatarProvider for NoAvatars {
    fn avatar_uri(&self, _email: &str, _size: u32) -> Option<String> {
        None
    }
}

/// Provider that never answers; the generic icon is used for every
/// attachment
pub struct NoThumbnails;

impl ThumbnailProvider for NoThumbnails {
    fn thumbnail(&self, _part: &MimePart) -> Option<String> {
        None
    }
}

/// Remote avatar-image service URI, keyed by a hash of the normalized
/// address
pub fn gravatar_uri(email: &str, size: u32) -> String {
    let digest = md5::compute(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{:x}?d=retro&s={}",
        digest, size
    )
}

/// Generic attachment icon (1x1 transparent PNG data URI) substituted
/// when no thumbnail could be produced
pub const FALLBACK_ATTACHMENT_ICON: &str = "data:image/png;base64,\
iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
