//! Terminal color utilities for CLI output.
//!
//! [`Painter`] knows which color belongs to which part of the tree; the
//! renderer asks it by role (header, pool, placeholder, failure...) and never
//! touches escape codes directly.

use std::io::IsTerminal;

use crate::types::ColorMode;

// ============================================================================
// ANSI Color Codes
// ============================================================================

pub const RED: &str = "\x1b[91m";
pub const YELLOW: &str = "\x1b[93m";
pub const GREEN: &str = "\x1b[92m";
pub const BLUE: &str = "\x1b[94m";

pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// `NO_COLOR` (https://no-color.org) disables auto-detected color.
const NO_COLOR_ENV: &str = "NO_COLOR";

/// Resolve a [`ColorMode`] against `NO_COLOR` and whether stdout is a terminal.
pub fn is_enabled(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::env::var_os(NO_COLOR_ENV).is_none() && std::io::stdout().is_terminal()
        }
    }
}

/// Role-based colorizer; a disabled painter returns its input untouched.
#[derive(Clone, Copy, Debug)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: is_enabled(mode),
        }
    }

    /// Never colors; what tests and piped output use.
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    /// Load balancer line: bold blue.
    pub fn header(&self, s: &str) -> String {
        self.paint(s, &[BOLD, BLUE])
    }

    pub fn pool(&self, s: &str) -> String {
        self.paint(s, &[GREEN])
    }

    pub fn marker(&self, s: &str) -> String {
        self.paint(s, &[BOLD])
    }

    /// "No pools" / "No members".
    pub fn placeholder(&self, s: &str) -> String {
        self.paint(s, &[BLUE])
    }

    /// Not-yet-active provisioning: bold yellow.
    pub fn pending(&self, s: &str) -> String {
        self.paint(s, &[YELLOW, BOLD])
    }

    /// Not-online operating status and fetch errors.
    pub fn failure(&self, s: &str) -> String {
        self.paint(s, &[RED])
    }

    fn paint(&self, s: &str, codes: &[&str]) -> String {
        if !self.enabled {
            return s.to_string();
        }
        let mut out = codes.concat();
        out.push_str(s);
        out.push_str(RESET);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_painter_passes_text_through() {
        let p = Painter::plain();
        for painted in [
            p.header("x"),
            p.pool("x"),
            p.marker("x"),
            p.placeholder("x"),
            p.pending("x"),
            p.failure("x"),
        ] {
            assert_eq!(painted, "x");
        }
    }

    #[test]
    fn roles_map_to_codes() {
        let p = Painter { enabled: true };
        assert_eq!(p.failure("down"), "\x1b[91mdown\x1b[0m");
        assert_eq!(p.pending("wait"), "\x1b[93m\x1b[1mwait\x1b[0m");
        assert_eq!(p.pool("p"), "\x1b[92mp\x1b[0m");
        assert_eq!(p.header("lb"), "\x1b[1m\x1b[94mlb\x1b[0m");
    }

    #[test]
    fn explicit_modes_ignore_terminal() {
        assert!(is_enabled(ColorMode::Always));
        assert!(!is_enabled(ColorMode::Never));
    }
}
