//! Address types shared by message headers

use serde::{Deserialize, Serialize};

/// A single mail address as displayed in a header row
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Display name, falling back to the local part when the header
    /// carried none
    pub name: String,
    /// Bare address (user@example.org)
    pub email: String,
    /// Full form as written in the header ("Name <user@example.org>")
    pub full_address: String,
}

impl Address {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        full_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            full_address: full_address.into(),
        }
    }
}
