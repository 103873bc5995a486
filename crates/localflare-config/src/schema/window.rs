//! Native window configuration types.

use serde::{Deserialize, Serialize};

/// Appearance and behavior of the single top-level window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial logical width in pixels.
    pub width: u32,
    /// Initial logical height in pixels.
    pub height: u32,
    pub resizable: bool,
    /// Allow the user to select page text.
    pub text_select: bool,
    /// Ask the page for confirmation before closing.
    pub confirm_close: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "LocalFlare App".into(),
            width: 800,
            height: 600,
            resizable: true,
            text_select: true,
            confirm_close: true,
        }
    }
}
