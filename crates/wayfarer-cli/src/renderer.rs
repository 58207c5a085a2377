//! Terminal rendering of the markdown produced by the core display types
//!
//! Rich output styles each line by what it is: headers, notices from the
//! cache, operation status lines and ordinary markdown rendered by termimad.
//! `--no-color` prints the markdown untouched.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{
    crossterm::style::{Color, Stylize},
    MadSkin,
};

/// What a line of core markdown carries.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header(&'a str),
    /// `> ` quoted notice, without its marker
    Notice(&'a str),
    Success(&'a str),
    Warning(&'a str),
    Error(&'a str),
    Markdown(&'a str),
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Self {
        if line.starts_with('#') {
            Line::Header(line)
        } else if let Some(notice) = line.strip_prefix("> ") {
            Line::Notice(notice)
        } else if line.starts_with("Success: ") {
            Line::Success(line)
        } else if line.starts_with("Warning: ") {
            Line::Warning(line)
        } else if line.starts_with("Error: ") {
            Line::Error(line)
        } else {
            Line::Markdown(line)
        }
    }
}

/// Prints core markdown to stdout, styled or plain.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout, markdown)?;
        stdout.flush()?;
        Ok(())
    }

    fn write_to(&self, out: &mut impl Write, markdown: &str) -> io::Result<()> {
        if !self.rich_enabled {
            return out.write_all(markdown.as_bytes());
        }
        for line in markdown.lines() {
            match Line::classify(line) {
                Line::Header(text) => writeln!(out, "{}", text.blue().bold())?,
                Line::Notice(text) => writeln!(out, "{}", text.yellow())?,
                Line::Success(text) => writeln!(out, "{}", text.green())?,
                Line::Warning(text) => writeln!(out, "{}", text.yellow())?,
                Line::Error(text) => writeln!(out, "{}", text.red())?,
                Line::Markdown(text) => writeln!(out, "{}", self.skin.inline(text))?,
            }
        }
        Ok(())
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

    fn rendered(renderer: &TerminalRenderer, markdown: &str) -> String {
        let mut out = Vec::new();
        renderer.write_to(&mut out, markdown).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_lines_are_classified() {
        assert_eq!(Line::classify("## Porto"), Line::Header("## Porto"));
        assert_eq!(
            Line::classify("> Showing saved itineraries"),
            Line::Notice("Showing saved itineraries")
        );
        assert_eq!(
            Line::classify("Success: Cleared the offline cache"),
            Line::Success("Success: Cleared the offline cache")
        );
        assert_eq!(
            Line::classify("Warning: Nothing was cleared"),
            Line::Warning("Warning: Nothing was cleared")
        );
        assert_eq!(Line::classify("Error: gone"), Line::Error("Error: gone"));
        assert_eq!(
            Line::classify("- **Status**: ○ Planning"),
            Line::Markdown("- **Status**: ○ Planning")
        );
        // A quote marker without its space is ordinary text.
        assert_eq!(Line::classify(">note"), Line::Markdown(">note"));
    }

    #[test]
    fn test_plain_output_is_untouched() {
        let markdown = "## Porto\n\n> Offline\n- **Status**: ○ Planning\n";
        assert_eq!(rendered(&TerminalRenderer::new(false), markdown), markdown);
    }

    #[test]
    fn test_rich_output_keeps_text_and_drops_notice_marker() {
        let output = rendered(
            &TerminalRenderer::new(true),
            "## Porto\n> Showing saved itineraries\nSuccess: Done\n",
        );

        assert!(output.contains("## Porto"));
        assert!(output.contains("Showing saved itineraries"));
        assert!(!output.contains("> Showing"));
        assert!(output.contains("Success: Done"));
        assert_eq!(output.lines().count(), 3);
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
