//! Print sink used by the engine.
//!
//! The engine never lays out text itself beyond a single option line; it hands
//! every line to a [`Console`] together with a severity and a logging level.
//! Sinks decide whether the level is admitted and how the line is styled.

use std::cell::RefCell;
use std::io::{self, IsTerminal, Write};
use std::rc::Rc;

use crate::help::{OptionLine, Tag, MAX_OPT_NAME_LENGTH};

pub const CONSOLE_WIDTH: usize = 120;
pub const TEXT_BLOCK_SIZE: usize = CONSOLE_WIDTH - 40;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Verbosity of a message, or the threshold of a sink.
///
/// A message at level `L` is shown by a sink whose threshold is `T` when
/// neither is `Disabled` and `L <= T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LoggingLevel {
    Disabled,
    #[default]
    Zero,
    One,
    Two,
    Three,
}

impl LoggingLevel {
    pub fn admits(self, level: LoggingLevel) -> bool {
        self != LoggingLevel::Disabled && level != LoggingLevel::Disabled && level <= self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Debug,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => io::stdout().is_terminal(),
        }
    }
}

pub trait Console {
    fn emit(&mut self, severity: Severity, level: LoggingLevel, text: &str);

    fn print(&mut self, level: LoggingLevel, text: &str) {
        self.emit(Severity::Info, level, text);
    }

    fn debug(&mut self, level: LoggingLevel, text: &str) {
        self.emit(Severity::Debug, level, text);
    }

    fn warn(&mut self, level: LoggingLevel, text: &str) {
        self.emit(Severity::Warn, level, text);
    }

    fn error(&mut self, level: LoggingLevel, text: &str) {
        self.emit(Severity::Error, level, text);
    }

    fn new_line(&mut self, level: LoggingLevel) {
        self.print(level, "");
    }

    fn header(&mut self, level: LoggingLevel, title: &str) {
        self.print(level, &rule(title, '='));
    }

    fn sub_header(&mut self, level: LoggingLevel, title: &str) {
        self.print(level, &rule(title, '-'));
    }

    /// Print a paragraph wrapped at [`TEXT_BLOCK_SIZE`] columns.
    fn block(&mut self, level: LoggingLevel, text: &str) {
        for line in wrap_text(text, TEXT_BLOCK_SIZE) {
            self.print(level, &line);
        }
    }

    fn option(&mut self, level: LoggingLevel, line: &OptionLine) {
        self.print(level, &line.to_string());
    }
}

/// `=[ title ]=====...` padded to the console width.
fn rule(title: &str, fill: char) -> String {
    let mut line = format!("{}[ {} ]", fill, title);
    let width = line.chars().count();
    if width < CONSOLE_WIDTH {
        line.extend(std::iter::repeat(fill).take(CONSOLE_WIDTH - width));
    }
    line
}

/// Break `text` at word boundaries so no line exceeds `width` bytes.
/// A word longer than `width` is left on its own line unbroken.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text.trim_start_matches(' ');
    while rest.len() > width {
        let mut cut = width;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let break_pos = match rest[..cut].rfind(' ') {
            Some(pos) if pos > 0 => pos,
            _ => break,
        };
        lines.push(rest[..break_pos].to_string());
        rest = rest[break_pos..].trim_start_matches(' ');
    }
    if !rest.is_empty() {
        lines.push(rest.to_string());
    }
    lines
}

// ============================================================================
// Terminal
// ============================================================================

/// Sink writing informational lines to `out` and warnings/errors to `err`.
///
/// Debug lines are not written; they are forwarded as `tracing` events under
/// the `umami` target so the host's subscriber decides where they go.
pub struct Terminal<O: Write, E: Write> {
    out: O,
    err: E,
    threshold: LoggingLevel,
    color: bool,
}

impl Terminal<io::Stdout, io::Stderr> {
    pub fn stdio(threshold: LoggingLevel, color: ColorMode) -> Self {
        Terminal::new(io::stdout(), io::stderr(), threshold, color.enabled())
    }
}

impl<O: Write, E: Write> Terminal<O, E> {
    pub fn new(out: O, err: E, threshold: LoggingLevel, color: bool) -> Self {
        Terminal {
            out,
            err,
            threshold,
            color,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }
}

impl<O: Write, E: Write> Console for Terminal<O, E> {
    fn emit(&mut self, severity: Severity, level: LoggingLevel, text: &str) {
        if !self.threshold.admits(level) {
            return;
        }
        // Write failures on the sink are not the parser's problem.
        let _ = match severity {
            Severity::Debug => {
                tracing::debug!(target: "umami", "{}", text);
                Ok(())
            }
            Severity::Info => writeln!(self.out, "{}", text),
            Severity::Warn => {
                let prefix = self.paint(YELLOW, "Warning:");
                writeln!(self.err, "{} {}", prefix, text)
            }
            Severity::Error => {
                let prefix = self.paint(RED, "Error:");
                writeln!(self.err, "{} {}", prefix, text)
            }
        };
    }

    fn header(&mut self, level: LoggingLevel, title: &str) {
        let line = rule(title, '=');
        let line = self.paint(BOLD, &line);
        self.print(level, &line);
    }

    fn option(&mut self, level: LoggingLevel, line: &OptionLine) {
        let tag = match line.tag {
            Tag::Arg => self.paint(CYAN, line.tag.as_str()),
            Tag::Function => self.paint(GREEN, line.tag.as_str()),
            Tag::None => line.tag.as_str().to_string(),
        };
        let text = format!(
            "    {:<width$} {} {}",
            line.name,
            tag,
            line.description,
            width = MAX_OPT_NAME_LENGTH
        );
        self.print(level, text.trim_end());
    }
}

// ============================================================================
// Capture
// ============================================================================

/// In-memory sink. Clones share the same buffer, so one handle can be given
/// to a context while another is kept for inspection.
#[derive(Debug, Clone)]
pub struct Capture {
    threshold: LoggingLevel,
    lines: Rc<RefCell<Vec<(Severity, String)>>>,
}

impl Capture {
    pub fn new(threshold: LoggingLevel) -> Self {
        Capture {
            threshold,
            lines: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.borrow().clone()
    }

    /// Every admitted line of the given severity.
    pub fn of(&self, severity: Severity) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, l)| l.clone())
            .collect()
    }

    /// All informational output joined with newlines.
    pub fn text(&self) -> String {
        self.of(Severity::Info).join("\n")
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl Default for Capture {
    fn default() -> Self {
        Capture::new(LoggingLevel::Zero)
    }
}

impl Console for Capture {
    fn emit(&mut self, severity: Severity, level: LoggingLevel, text: &str) {
        if self.threshold.admits(level) {
            self.lines.borrow_mut().push((severity, text.to_string()));
        }
    }
}
