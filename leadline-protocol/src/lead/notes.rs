use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::format::{format_timestamp, TIMESTAMP_FORMAT};

/// One line of a lead's follow-up history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowupEntry {
    /// When the note was written. `None` for legacy lines without a
    /// recognisable `[timestamp]` prefix; those are kept verbatim in `text`.
    pub at: Option<NaiveDateTime>,
    pub text: String,
}

impl FollowupEntry {
    pub fn new(at: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            at: Some(at),
            text: single_line(&text.into()),
        }
    }

    /// Parses one stored line. Only lines that format back to exactly the same
    /// text are split into timestamp and text.
    fn parse_line(line: &str) -> Self {
        let parsed = line
            .strip_prefix('[')
            .and_then(|rest| rest.split_once("] "))
            .and_then(|(stamp, text)| {
                NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
                    .ok()
                    .map(|at| FollowupEntry {
                        at: Some(at),
                        text: text.to_string(),
                    })
            });

        match parsed {
            Some(entry) if entry.to_line() == line => entry,
            _ => FollowupEntry {
                at: None,
                text: line.to_string(),
            },
        }
    }

    fn to_line(&self) -> String {
        match &self.at {
            Some(at) => format!("[{}] {}", format_timestamp(at), self.text),
            None => self.text.clone(),
        }
    }
}

impl fmt::Display for FollowupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Append-only follow-up history, oldest entry first.
///
/// Storage keeps the history as newline-joined `[YYYY-MM-DD HH:MM:SS] text`
/// lines; [`FollowupLog::parse`] and [`FollowupLog::to_storage`] convert at that
/// boundary only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct FollowupLog {
    entries: Vec<FollowupEntry>,
}

impl FollowupLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the stored text form. Blank lines carry no entry and are dropped.
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(FollowupEntry::parse_line)
            .collect();
        Self { entries }
    }

    /// Text form written to storage.
    pub fn to_storage(&self) -> String {
        self.entries
            .iter()
            .map(FollowupEntry::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Appends a timestamped note. Empty notes are ignored; embedded line
    /// breaks are folded so each note stays on one stored line.
    pub fn append(&mut self, at: NaiveDateTime, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.entries.push(FollowupEntry::new(at, text.trim()));
        true
    }

    /// Returns a copy extended with one more note.
    pub fn with_note(&self, at: NaiveDateTime, text: &str) -> Self {
        let mut next = self.clone();
        next.append(at, text);
        next
    }

    /// Entries in storage order (oldest first).
    pub fn entries(&self) -> &[FollowupEntry] {
        &self.entries
    }

    /// Entries in display order (most recent first).
    pub fn newest_first(&self) -> impl Iterator<Item = &FollowupEntry> {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&FollowupEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `next` keeps every entry of `self`, in order, as its prefix.
    pub fn is_extended_by(&self, next: &FollowupLog) -> bool {
        next.entries.len() >= self.entries.len()
            && self
                .entries
                .iter()
                .zip(next.entries.iter())
                .all(|(old, new)| old == new)
    }
}

impl fmt::Display for FollowupLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage())
    }
}

impl From<FollowupLog> for Vec<String> {
    fn from(log: FollowupLog) -> Self {
        log.entries.iter().map(FollowupEntry::to_line).collect()
    }
}

impl From<Vec<String>> for FollowupLog {
    fn from(lines: Vec<String>) -> Self {
        FollowupLog::parse(&lines.join("\n"))
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
