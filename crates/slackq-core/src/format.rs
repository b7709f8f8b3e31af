//! Timestamp decoding and single-line rendering of messages, channels and users.

use chrono::{DateTime, Local, Utc};

use crate::config::DisplayZone;
use crate::directory::UserDirectory;
use crate::slack::{Channel, Message, SearchMatch, User};
use crate::{CoreError, Result, TimestampError};

/// Rendered form of message times, e.g. `2023-11-14 22:13:20`.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MICROS_DIGITS: usize = 6;

/// Decode a Slack timestamp (`<seconds>.<fraction>`) to microsecond precision.
///
/// The fraction is read digit by digit rather than through a float, so
/// `1700000000.123456` decodes to exactly 123456 microseconds. Digits past the
/// sixth are truncated.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] if `ts` is not a decimal number or lies outside
/// the representable range.
pub fn decode_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    let fail = |source| CoreError::Parse {
        value: ts.to_string(),
        source,
    };

    let (secs, frac) = ts.split_once('.').unwrap_or((ts, ""));
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if secs.is_empty() || !is_digits(secs) || !is_digits(frac) {
        return Err(fail(TimestampError::NotDecimal));
    }

    let secs: i64 = secs
        .parse()
        .map_err(|_| fail(TimestampError::OutOfRange))?;
    let micros = frac
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(MICROS_DIGITS)
        .fold(0_u32, |acc, b| acc * 10 + u32::from(b - b'0'));

    DateTime::from_timestamp(secs, micros * 1_000).ok_or_else(|| fail(TimestampError::OutOfRange))
}

/// Renders messages as `[time] author in #channel: "text"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter {
    zone: DisplayZone,
}

impl MessageFormatter {
    /// Create a formatter rendering times in `zone`.
    #[must_use]
    pub const fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    /// Render a decoded timestamp in the configured zone.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the timestamp cannot be decoded.
    pub fn render_time(&self, ts: &str) -> Result<String> {
        let at = decode_timestamp(ts)?;
        Ok(match self.zone {
            DisplayZone::Utc => at.format(TIME_FORMAT).to_string(),
            DisplayZone::Local => at.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        })
    }

    /// Format a history or thread message, resolving its author through
    /// `directory`. Unknown authors render as an empty name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the timestamp cannot be decoded.
    pub fn message_line(
        &self,
        msg: &Message,
        channel: &str,
        directory: &UserDirectory,
    ) -> Result<String> {
        self.line(&msg.ts, directory.display_name(&msg.user), channel, &msg.text)
    }

    /// Format a search match with its own denormalized author and channel.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the timestamp cannot be decoded.
    pub fn search_line(&self, m: &SearchMatch) -> Result<String> {
        self.line(&m.ts, &m.username, &m.channel.name, &m.text)
    }

    fn line(&self, ts: &str, author: &str, channel: &str, text: &str) -> Result<String> {
        let time = self.render_time(ts)?;
        Ok(format!("[{time}] {author} in #{channel}: {}", quote(text)))
    }
}

/// `- name (ID: id)`, followed by an indented topic line when one is set.
#[must_use]
pub fn channel_lines(channel: &Channel) -> Vec<String> {
    let mut lines = vec![format!("- {} (ID: {})", channel.name, channel.id)];
    if !channel.topic.value.is_empty() {
        lines.push(format!("  Topic: {}", channel.topic.value));
    }
    lines
}

/// `- name (Name: real name) (ID: id)`.
#[must_use]
pub fn user_line(user: &User) -> String {
    format!("- {} (Name: {}) (ID: {})", user.name, user.real_name, user.id)
}

/// Double-quote `text` with Go-style escapes.
///
/// Printable characters, combining marks included, are kept as-is. Control
/// characters use `\a`-style or `\xNN` escapes; invisible formatting
/// characters, non-ASCII spaces and private-use characters use `\uNNNN` or
/// `\UNNNNNNNN`.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\u{7}' => quoted.push_str("\\a"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{b}' => quoted.push_str("\\v"),
            ' ' => quoted.push(' '),
            c if u32::from(c) < 0x20 || c == '\u{7f}' => {
                quoted.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c if is_printable(c) => quoted.push(c),
            c if u32::from(c) < 0x1_0000 => quoted.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => quoted.push_str(&format!("\\U{:08x}", u32::from(c))),
        }
    }
    quoted.push('"');
    quoted
}

/// Unicode format characters (category Cf).
const FORMAT_CHARS: &[(u32, u32)] = &[
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x180E, 0x180E),
    (0x200B, 0x200F),
    (0x202A, 0x202E),
    (0x2060, 0x2064),
    (0x2066, 0x206F),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
];

fn is_printable(c: char) -> bool {
    let cp = u32::from(c);
    let private_use =
        (0xE000..=0xF8FF).contains(&cp) || (0xF_0000..=0xF_FFFD).contains(&cp) || cp >= 0x10_0000;
    !(c.is_control()
        || c.is_whitespace()
        || private_use
        || FORMAT_CHARS
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&cp)))
}
