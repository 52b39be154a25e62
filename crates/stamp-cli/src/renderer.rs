//! Markdown rendering for converter descriptions
//!
//! `inspect` describes a converter as a short markdown document. With color
//! on it is laid out by termimad: headers in cyan, setting names in yellow
//! and patterns highlighted as inline code. With color off the markdown is
//! written unchanged so it stays readable when piped.

use std::io::{self, Write};

use anyhow::{Context, Result};
use termimad::{crossterm::style::Color, MadSkin};

/// Writes markdown either styled or verbatim
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.inline_code.set_fg(Color::Green);
        skin.inline_code.set_bg(Color::Reset);

        Self { rich_enabled, skin }
    }

    /// Render markdown text to standard output
    pub fn render(&self, markdown: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, markdown)?;
        out.flush().context("Failed to flush output")
    }

    fn render_to<W: Write>(&self, out: &mut W, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            self.skin
                .write_text_on(out, markdown)
                .context("Failed to render markdown")
        } else {
            out.write_all(markdown.as_bytes())
                .context("Failed to write output")
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "# TimestampConverter\n\n- **Locale**: fr_FR\n- **Pattern**: `dd/MM/yy HH:mm`\n";

    fn rendered(renderer: &TerminalRenderer) -> String {
        let mut buffer = Vec::new();
        renderer.render_to(&mut buffer, DESCRIPTION).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_plain_output_is_verbatim() {
        assert_eq!(rendered(&TerminalRenderer::new(false)), DESCRIPTION);
    }

    #[test]
    fn test_rich_output_strips_markup() {
        let text = rendered(&TerminalRenderer::default());
        assert!(text.contains("TimestampConverter"));
        assert!(text.contains("fr_FR"));
        assert!(text.contains("dd/MM/yy HH:mm"));
        assert!(!text.contains("**Locale**"));
        assert!(!text.contains("`dd/MM/yy HH:mm`"));
    }
}
