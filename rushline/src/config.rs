//! # Configuration Module - Comparison and Windowing Settings
//!
//! Settings that change how a [`TypingSession`](crate::TypingSession) compares input and which
//! lines it exposes for display.
//!
//! ## Usage
//!
//! ```rust
//! use rushline::config::Configuration;
//!
//! // Forgiving whitespace, three visible lines
//! let config = Configuration::default();
//!
//! // Exact comparison with a wider context window
//! let config = Configuration {
//!     strict: true,
//!     window_size: 5,
//! };
//! ```

/// Runtime configuration for a typing session
///
/// Both settings only matter for comparisons and projections; they never change the target text
/// itself in whole-document mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Require exact character-for-character equality
    ///
    /// When `false`, an ordinary space and a no-break space compare equal during live feedback.
    /// In windowed mode a non-strict session also collapses runs of spaces in the active line and
    /// ignores trailing whitespace when deciding whether the line is complete.
    ///
    /// **Default**: false
    pub strict: bool,

    /// Number of lines shown around the active line in windowed mode
    ///
    /// Expected to be odd so the active line sits in the middle. Even values still work; the
    /// window then extends `window_size / 2` lines in both directions.
    ///
    /// **Default**: 3
    pub window_size: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            strict: false,
            window_size: 3,
        }
    }
}
