//! Per-kind attribute metadata and debug rendering
//!
//! Consumed by the surrounding schema-registration layer and by the debug
//! views.

use crate::value::TriState;

/// Marker rendered in place of a sensitive attribute's value.
pub const REDACTED: &str = "[redacted]";

/// Marker rendered for an explicitly null attribute.
pub const NULL_SENTINEL: &str = "null";

/// Marker rendered for an attribute whose value is not yet known.
pub const UNKNOWN_SENTINEL: &str = "(unknown)";

/// Declaration of a single transport attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub required: bool,
    /// Secret-shaped: redacted in debug views, flagged sensitive in the
    /// registered schema.
    pub sensitive: bool,
}

impl AttrSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            sensitive: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            sensitive: false,
        }
    }

    pub const fn sensitive(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            sensitive: true,
        }
    }
}

/// Render one attribute for a debug view, honoring its sensitivity.
pub fn render_attr(value: &TriState<String>, sensitive: bool) -> String {
    match value {
        TriState::Known(_) if sensitive => REDACTED.to_string(),
        TriState::Known(v) => v.clone(),
        TriState::Null => NULL_SENTINEL.to_string(),
        TriState::Unknown => UNKNOWN_SENTINEL.to_string(),
    }
}
