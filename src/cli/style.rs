//! Terminal styling for CLI output

use owo_colors::{OwoColorize, Stream, Style};
use std::fmt::Display;

/// Success marker
pub const CHECK: &str = "✓";

/// Semantic styles, applied only when stdout supports color
pub trait Stylize: Display + Sized {
    /// Headings and key values
    fn emphasis(&self) -> String {
        self.styled(Style::new().bold())
    }

    /// Names and counts
    fn accent(&self) -> String {
        self.styled(Style::new().cyan())
    }

    /// Secondary information
    fn muted(&self) -> String {
        self.styled(Style::new().dimmed())
    }

    /// Completed actions
    fn success(&self) -> String {
        self.styled(Style::new().green())
    }

    /// Skips and dry runs
    fn warn(&self) -> String {
        self.styled(Style::new().yellow())
    }

    /// Render with `style` if the terminal supports it
    fn styled(&self, style: Style) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.style(style))
            .to_string()
    }
}

impl<T: Display> Stylize for T {}
