//! Line-wrapping event formatter
//!
//! - Lines are wrapped at `max_width`, continuation text indented by `indent`
//! - Explicit newlines in a message start a new indented line
//! - Every line after the first repeats the record prefix, with its trailing
//!   space replaced by `+`

use chrono::Utc;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixStyle {
    /// `2024-01-31 12:00:00 INFO:target `
    File,
    /// `target: `
    Console,
}

/// [`FormatEvent`] that wraps long and multi-line messages.
#[derive(Debug, Clone)]
pub struct WrappedFormat {
    indent: usize,
    max_width: usize,
    style: PrefixStyle,
}

impl WrappedFormat {
    /// Timestamped format used for log files.
    pub fn file(indent: usize, max_width: usize) -> Self {
        Self { indent, max_width, style: PrefixStyle::File }
    }

    /// Short format used on an interactive terminal.
    pub fn console(indent: usize, max_width: usize) -> Self {
        Self { indent, max_width, style: PrefixStyle::Console }
    }

    fn prefix(&self, level: &Level, target: &str) -> String {
        match self.style {
            PrefixStyle::File => format!(
                "{} {}:{} ",
                Utc::now().format(TIMESTAMP_FORMAT),
                level_name(level),
                target
            ),
            PrefixStyle::Console => format!("{target}: "),
        }
    }
}

impl<S, N> FormatEvent<S, N> for WrappedFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let prefix = self.prefix(meta.level(), meta.target());
        writeln!(writer, "{}", render_record(&prefix, &message, self.indent, self.max_width))
    }
}

/// Level names as they appear in log files.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// Lay out one log record: `prefix` followed by the wrapped `message`.
pub fn render_record(prefix: &str, message: &str, indent: usize, max_width: usize) -> String {
    if message.is_empty() {
        return prefix.to_string();
    }

    let mut continuation: String = prefix.chars().collect();
    continuation.pop();
    continuation.push('+');

    let pad = " ".repeat(indent);
    let mut lines = Vec::new();
    for (index, raw) in message.split('\n').enumerate() {
        let text = if index == 0 { raw.to_string() } else { format!("{pad}{raw}") };
        let wrapped = wrap(&text, max_width, &pad);
        if wrapped.is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrapped);
        }
    }

    let mut out = String::from(prefix);
    out.push_str(&lines.join(&format!("\n{continuation}")));
    out
}

/// Greedy word wrap to `width` display columns.
///
/// Leading whitespace of the text is kept; whitespace at wrap points is
/// dropped. Words wider than a line are split. Whitespace-only text yields
/// no lines.
pub fn wrap(text: &str, width: usize, subsequent_indent: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut pending_space = String::new();

    for chunk in split_chunks(text) {
        if chunk.starts_with(char::is_whitespace) {
            pending_space.push_str(chunk);
            continue;
        }

        let mut word = chunk;
        loop {
            let indent = if lines.is_empty() { "" } else { subsequent_indent };
            let available = width.saturating_sub(indent.width()).max(1);
            let lead =
                if current.is_empty() && !lines.is_empty() { "" } else { pending_space.as_str() };
            let used = current.width() + lead.width();

            if used + word.width() <= available {
                current.push_str(lead);
                current.push_str(word);
                break;
            }

            if !current.is_empty() {
                lines.push(format!("{indent}{current}"));
                current.clear();
                pending_space.clear();
                continue;
            }

            let (head, tail) = split_at_width(word, available.saturating_sub(used).max(1));
            current.push_str(lead);
            current.push_str(head);
            lines.push(format!("{indent}{current}"));
            current.clear();
            pending_space.clear();
            word = tail;
            if word.is_empty() {
                break;
            }
        }
        pending_space.clear();
    }

    if !current.is_empty() {
        let indent = if lines.is_empty() { "" } else { subsequent_indent };
        lines.push(format!("{indent}{current}"));
    }
    lines
}

/// Split into alternating runs of whitespace and non-whitespace.
fn split_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (index, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|previous| previous != space) {
            chunks.push(&text[start..index]);
            start = index;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Longest prefix of `word` no wider than `room` columns (at least one char).
fn split_at_width(word: &str, room: usize) -> (&str, &str) {
    let mut used = 0;
    let mut end = 0;
    for (index, ch) in word.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > room && end > 0 {
            break;
        }
        used += w;
        end = index + ch.len_utf8();
    }
    word.split_at(end)
}
