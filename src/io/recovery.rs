//! Append-only diagnostics log, `.recovery.log` in the data directory.
//!
//! Each entry is a markdown block: a `## <rfc3339> <category>: <description>`
//! heading, `Key: value` lines, an optional fenced body holding the data that
//! could not be loaded or saved, and a closing `---` rule.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tempfile::NamedTempFile;

use crate::io::lock::{DirLock, RECOVERY_LOCK};

const LOG_FILE: &str = ".recovery.log";
/// Past this size, old entries are dropped before the next append
const TRIM_THRESHOLD: u64 = 1024 * 1024;
/// Entries older than this many days are prunable
pub const PRUNE_AGE_DAYS: i64 = 30;
const LOG_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

const FENCE: &str = "```";
const ENTRY_END: &str = "---";

const PREAMBLE: &str = "\
<!-- zenweekly recovery log
     Habits that could not be loaded or saved are kept here.
     zw recovery          show recent entries
     zw recovery prune    drop entries older than 30 days
     The file can be deleted once nothing in it is needed. -->

---
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryCategory {
    /// Stored data could not be read or parsed
    Parser,
    /// A store write failed
    Write,
}

impl RecoveryCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RecoveryCategory::Parser => "parser",
            RecoveryCategory::Write => "write",
        }
    }

    pub fn parse_category(s: &str) -> Option<Self> {
        [RecoveryCategory::Parser, RecoveryCategory::Write]
            .into_iter()
            .find(|c| c.as_str() == s)
    }
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryEntry {
    #[serde(serialize_with = "serialize_stamp")]
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    #[serde(serialize_with = "serialize_fields")]
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    /// A new entry stamped with the current time
    pub fn now(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The entry as it is written to the log
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            stamp(&self.timestamp),
            self.category,
            self.description
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str(&format!(
                "\n{}text\n{}\n{}\n",
                FENCE,
                self.body.trim_end_matches('\n'),
                FENCE
            ));
        }
        out.push('\n');
        out.push_str(ENTRY_END);
        out.push('\n');
        out
    }
}

fn stamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn serialize_stamp<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&stamp(ts))
}

fn serialize_fields<S: Serializer>(fields: &[(String, String)], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(fields.iter().map(|(k, v)| (k, v)))
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Replace `path` with `content` via a sibling temp file and rename
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map(|_| ()).map_err(|e| e.error)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Append an entry. Never fails the caller; a failure prints one warning.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(data_dir, &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn append_entry(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let _lock = DirLock::acquire(data_dir, RECOVERY_LOCK, LOG_LOCK_TIMEOUT).map_err(io::Error::other)?;
    let path = recovery_log_path(data_dir);

    if fs::metadata(&path).is_ok_and(|m| m.len() > TRIM_THRESHOLD) {
        rewrite_since(&path, prune_cutoff())?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if file.metadata()?.len() == 0 {
        file.write_all(PREAMBLE.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

fn prune_cutoff() -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS)
}

/// Drop every entry stamped before `cutoff`. Returns how many were dropped.
fn rewrite_since(path: &Path, cutoff: DateTime<Utc>) -> io::Result<usize> {
    let content = fs::read_to_string(path)?;
    let blocks = split_blocks(&content);
    let mut kept = String::from(blocks.preamble);
    let mut dropped = 0;
    for block in blocks.entries {
        if block_timestamp(block).is_some_and(|ts| ts >= cutoff) {
            kept.push_str(block);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        atomic_write(path, kept.as_bytes())?;
    }
    Ok(dropped)
}

/// Remove entries older than [`PRUNE_AGE_DAYS`], or all of them.
/// Returns the number removed.
pub fn prune_recovery(data_dir: &Path, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let _lock = DirLock::acquire(data_dir, RECOVERY_LOCK, LOG_LOCK_TIMEOUT).map_err(io::Error::other)?;
    let cutoff = if all {
        DateTime::<Utc>::MAX_UTC
    } else {
        prune_cutoff()
    };
    rewrite_since(&path, cutoff)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Entries newest first, at most `limit` of them
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let Ok(content) = fs::read_to_string(recovery_log_path(data_dir)) else {
        return Vec::new();
    };
    let mut entries: Vec<RecoveryEntry> = split_blocks(&content)
        .entries
        .into_iter()
        .filter_map(parse_block)
        .collect();
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    entries
}

/// The log cut into its preamble and one text slice per entry
struct LogBlocks<'a> {
    preamble: &'a str,
    entries: Vec<&'a str>,
}

/// An entry starts at each heading line outside a fenced body
fn split_blocks(content: &str) -> LogBlocks<'_> {
    let mut starts = Vec::new();
    let mut in_fence = false;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let text = line.trim_end_matches('\n');
        if text.starts_with(FENCE) {
            in_fence = !in_fence;
        } else if !in_fence && heading(text).is_some() {
            starts.push(offset);
        }
        offset += line.len();
    }

    let preamble_end = starts.first().copied().unwrap_or(content.len());
    let entries = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(content.len());
            &content[start..end]
        })
        .collect();
    LogBlocks {
        preamble: &content[..preamble_end],
        entries,
    }
}

fn block_timestamp(block: &str) -> Option<DateTime<Utc>> {
    block.lines().next().and_then(heading).map(|(ts, _, _)| ts)
}

fn parse_block(block: &str) -> Option<RecoveryEntry> {
    let mut lines = block.lines();
    let (timestamp, category, description) = lines.next().and_then(heading)?;

    let mut fields = Vec::new();
    let mut body: Vec<&str> = Vec::new();
    let mut in_fence = false;
    for line in lines {
        if in_fence {
            if line == FENCE {
                in_fence = false;
            } else {
                body.push(line);
            }
        } else if line.starts_with(FENCE) {
            in_fence = true;
        } else if line == ENTRY_END {
            break;
        } else if let Some((key, value)) = line.split_once(": ") {
            fields.push((key.trim().to_string(), value.to_string()));
        }
    }

    Some(RecoveryEntry {
        timestamp,
        category,
        description,
        fields,
        body: body.join("\n"),
    })
}

fn heading(line: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    line.strip_prefix("## ").and_then(parse_entry_header)
}

/// Parse `<timestamp> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (ts, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(ts).ok()?.with_timezone(&Utc);
    let (category, description) = rest.split_once(": ")?;
    Some((
        timestamp,
        RecoveryCategory::parse_category(category)?,
        description.to_string(),
    ))
}
