//! Per-tool history of recent inputs and outputs.
//!
//! Each tool's entries are one JSON array stored under `history.<tool>`,
//! newest first and capped at the history limit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{EntryId, KeyValueStore, StoreError};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Longer inputs and outputs are cut to this many characters.
pub const MAX_FIELD_CHARS: usize = 4_096;

const KEY_PREFIX: &str = "history.";

/// A toolbox panel whose activity is remembered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    IdCard,
    Encode,
    Decode,
    Hash,
    Password,
    Color,
    Time,
    Units,
    Json,
    Regex,
    Qr,
}

impl Tool {
    pub const ALL: [Tool; 11] = [
        Tool::IdCard,
        Tool::Encode,
        Tool::Decode,
        Tool::Hash,
        Tool::Password,
        Tool::Color,
        Tool::Time,
        Tool::Units,
        Tool::Json,
        Tool::Regex,
        Tool::Qr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::IdCard => "id-card",
            Tool::Encode => "encode",
            Tool::Decode => "decode",
            Tool::Hash => "hash",
            Tool::Password => "password",
            Tool::Color => "color",
            Tool::Time => "time",
            Tool::Units => "units",
            Tool::Json => "json",
            Tool::Regex => "regex",
            Tool::Qr => "qr",
        }
    }

    fn key(self) -> String {
        format!("{}{}", KEY_PREFIX, self.as_str())
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = if normalized == "idcard" {
            "id-card".to_string()
        } else {
            normalized
        };
        Tool::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown tool '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub tool: Tool,
    pub input: String,
    pub output: String,
    pub recorded_at: DateTime<Utc>,
}

/// History over a borrowed store.
pub struct History<'a, S: KeyValueStore> {
    store: &'a mut S,
    limit: usize,
}

impl<'a, S: KeyValueStore> History<'a, S> {
    /// `limit` is clamped to `1..=MAX_HISTORY_LIMIT`.
    pub fn new(store: &'a mut S, limit: usize) -> Self {
        Self {
            store,
            limit: limit.clamp(1, MAX_HISTORY_LIMIT),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Records one use of `tool`. An entry with the same input and output
    /// moves to the front instead of repeating.
    pub fn record(
        &mut self,
        tool: Tool,
        input: &str,
        output: &str,
    ) -> Result<HistoryEntry, StoreError> {
        let entry = HistoryEntry {
            id: EntryId::new(),
            tool,
            input: truncate(input),
            output: truncate(output),
            recorded_at: Utc::now(),
        };

        let mut entries = self.list(tool)?;
        entries.retain(|e| !(e.input == entry.input && e.output == entry.output));
        entries.insert(0, entry.clone());
        if entries.len() > self.limit {
            debug!(tool = %tool, dropped = entries.len() - self.limit, "trimming history");
            entries.truncate(self.limit);
        }

        self.save(tool, &entries)?;
        Ok(entry)
    }

    /// Entries for `tool`, newest first.
    pub fn list(&self, tool: Tool) -> Result<Vec<HistoryEntry>, StoreError> {
        let key = tool.key();
        match self.store.get(&key)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| StoreError::Value { key, source })
            }
        }
    }

    /// Entries for every tool, newest first.
    pub fn list_all(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut all = Vec::new();
        for tool in Tool::ALL {
            all.extend(self.list(tool)?);
        }
        all.sort_by(|a, b| {
            b.recorded_at
                .cmp(&a.recorded_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(all)
    }

    /// Removes the entries for `tool`, returning how many there were.
    pub fn clear(&mut self, tool: Tool) -> Result<usize, StoreError> {
        let count = self.list(tool)?.len();
        self.store.delete(&tool.key())?;
        Ok(count)
    }

    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        let mut count = 0;
        for tool in Tool::ALL {
            count += self.clear(tool)?;
        }
        Ok(count)
    }

    fn save(&mut self, tool: Tool, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let key = tool.key();
        let raw = serde_json::to_string(entries).map_err(|source| StoreError::Value {
            key: key.clone(),
            source,
        })?;
        self.store.set(&key, raw)
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_FIELD_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
