//! ANSI color codes for terminal output.
//!
//! - Red/Yellow: diagnostic severities
//! - Blue: declaration names, file paths
//! - Dim: structure and metadata

/// ANSI color palette for CLI output.
///
/// Uses only standard 16-color ANSI codes so it reads on light and dark themes.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub red: &'static str,
    pub yellow: &'static str,
    pub blue: &'static str,
    pub dim: &'static str,
    pub bold: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        red: "\x1b[31m",
        yellow: "\x1b[33m",
        blue: "\x1b[34m",
        dim: "\x1b[2m",
        bold: "\x1b[1m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        red: "",
        yellow: "",
        blue: "",
        dim: "",
        bold: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
