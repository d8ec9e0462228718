//! Tag type with resolved display colors

use serde::{Deserialize, Serialize};

/// A message tag with its resolved foreground/background colors
///
/// Colors are embedded as literal values (e.g. "#rrggbb"), not names:
/// the renderer has no access to the host's color map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub tag: String,
    pub fg: String,
    pub bg: String,
}
