//! Terminal capability detection and utilities

use std::fmt;

use owo_colors::{colors::css, OwoColorize};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Pads `text` with spaces to `width` characters.
///
/// Counts characters rather than bytes, so Cyrillic names line up.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// A section title underlined to its own width.
pub fn heading(title: &str) -> String {
    format!("{title}\n{}", "─".repeat(title.chars().count()).dim())
}

/// A left-aligned name column followed by right-aligned counts.
#[derive(Debug, Default)]
pub struct CountTable {
    header: Option<(String, Vec<String>)>,
    rows: Vec<(String, Vec<String>)>,
}

impl CountTable {
    /// A table with a header row naming every column.
    pub fn with_header(name: &str, counts: &[&str]) -> Self {
        Self {
            header: Some((
                name.to_string(),
                counts.iter().map(ToString::to_string).collect(),
            )),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn row<T: fmt::Display>(
        &mut self,
        name: impl Into<String>,
        counts: impl IntoIterator<Item = T>,
    ) {
        let counts = counts.into_iter().map(|count| count.to_string()).collect();
        self.rows.push((name.into(), counts));
    }

    /// Renders the table, one line per row.
    ///
    /// Narrow output drops the alignment and labels each count with its
    /// lowercased column name instead.
    pub fn render(&self, narrow: bool) -> String {
        if narrow {
            self.render_narrow()
        } else {
            self.render_wide()
        }
    }

    /// Prints the table to stdout, sized for the current terminal.
    pub fn print(&self) {
        print!("{}", self.render(is_narrow()));
    }

    fn render_narrow(&self) -> String {
        let labels = self.header.as_ref().map(|(_, labels)| labels.as_slice());
        let mut out = String::new();
        for (name, counts) in &self.rows {
            let cells: Vec<String> = counts
                .iter()
                .enumerate()
                .map(|(column, count)| match labels.and_then(|l| l.get(column)) {
                    Some(label) => format!("{count} {}", label.to_lowercase()),
                    None => count.to_string(),
                })
                .collect();
            out.push_str(&format!("{name}: {}\n", cells.join(", ")));
        }
        out
    }

    fn render_wide(&self) -> String {
        let columns = self.rows.iter().map(|(_, counts)| counts.len()).max().unwrap_or(0);
        let header_names = self.header.iter().map(|(name, _)| name);
        let name_width = header_names
            .chain(self.rows.iter().map(|(name, _)| name))
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|column| {
                let label = self.header.as_ref().and_then(|(_, labels)| labels.get(column));
                self.rows
                    .iter()
                    .filter_map(|(_, counts)| counts.get(column))
                    .map(String::len)
                    .chain(label.map(|label| label.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        if let Some((name, labels)) = &self.header {
            out.push_str(&pad(name, name_width));
            for (label, &width) in labels.iter().zip(&widths) {
                out.push_str(&format!(" {label:>width$}"));
            }
            out.push('\n');
        }
        for (name, counts) in &self.rows {
            out.push_str(&pad(name, name_width));
            for (count, &width) in counts.iter().zip(&widths) {
                out.push_str(&format!(" {count:>width$}"));
            }
            out.push('\n');
        }
        out
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}
