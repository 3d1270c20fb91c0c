//! Win/loss ledger keyed by fighter name.
//!
//! The store fails open: an unreadable file loads as empty and a failed write is
//! logged and dropped, so a broken ledger never stops a duel from finishing.
//! `bump` is a plain load-modify-save with no locking; callers must not run two
//! bumps against the same file at once.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{DuelOutcome, DuelReport};

pub const MAX_STAT_RECORDS: usize = 200;
pub const DEFAULT_STATS_PATH: &str = "fighter_stats.txt";
const FIELD_DELIMITER: char = '|';
const NAME_DELIMITER_REPLACEMENT: char = '/';
/// Relaxed integer parsing rejects magnitudes above this.
const MAX_PARSED_MAGNITUDE: i64 = 2_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl StatRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wins: 0,
            losses: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("I/O error on stats file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in stats file '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk shape of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsFormat {
    /// `name|wins|losses` per line.
    #[default]
    Pipe,
    /// A JSON array of records.
    Json,
}

impl FromStr for StatsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pipe" | "txt" => Ok(Self::Pipe),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown stats format '{other}'")),
        }
    }
}

impl StatsFormat {
    pub fn decode(self, raw: &str) -> Result<Vec<StatRecord>, serde_json::Error> {
        let mut records = match self {
            Self::Pipe => raw.lines().filter_map(decode_line).collect(),
            Self::Json if raw.trim().is_empty() => Vec::new(),
            Self::Json => serde_json::from_str::<Vec<StatRecord>>(raw)?,
        };
        records.truncate(MAX_STAT_RECORDS);
        Ok(records)
    }

    /// Decodes raw file bytes. Pipe lines are decoded one at a time, so a stray
    /// non-UTF-8 byte only affects its own line (lossily) and never the rest.
    pub fn decode_bytes(self, raw: &[u8]) -> Result<Vec<StatRecord>, serde_json::Error> {
        match self {
            Self::Pipe => {
                let mut records: Vec<StatRecord> = raw
                    .split(|&byte| byte == b'\n')
                    .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
                    .filter_map(|line| decode_line(&String::from_utf8_lossy(line)))
                    .collect();
                records.truncate(MAX_STAT_RECORDS);
                Ok(records)
            }
            Self::Json => self.decode(&String::from_utf8_lossy(raw)),
        }
    }

    pub fn encode(self, records: &[StatRecord]) -> Result<String, serde_json::Error> {
        match self {
            Self::Pipe => Ok(records.iter().map(encode_record).collect()),
            Self::Json => serde_json::to_string_pretty(records),
        }
    }
}

/// Parses one `name|wins|losses` line. Lines missing either delimiter are skipped;
/// unparsable counts read as 0.
pub fn decode_line(line: &str) -> Option<StatRecord> {
    if line.is_empty() {
        return None;
    }
    let (name, rest) = line.split_once(FIELD_DELIMITER)?;
    let (wins, losses) = rest.split_once(FIELD_DELIMITER)?;
    Some(StatRecord {
        name: name.to_string(),
        wins: parse_count(wins),
        losses: parse_count(losses),
    })
}

/// Makes a name safe for one ledger line: the field delimiter becomes `/` and
/// control characters (newlines included) are dropped.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == FIELD_DELIMITER { NAME_DELIMITER_REPLACEMENT } else { c })
        .collect()
}

pub fn encode_record(record: &StatRecord) -> String {
    format!(
        "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}\n",
        sanitize_name(&record.name),
        record.wins,
        record.losses
    )
}

/// Optional sign followed by digits only; anything else, or a magnitude above
/// two billion, is `None`.
pub fn parse_relaxed_int(text: &str) -> Option<i64> {
    let (sign, digits) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => (1, text),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + i64::from(byte - b'0');
        if value > MAX_PARSED_MAGNITUDE {
            return None;
        }
    }
    Some(value * sign)
}

fn parse_count(text: &str) -> u32 {
    parse_relaxed_int(text)
        .map(|value| value.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or(0)
}

/// First record whose name matches exactly (case-sensitive).
pub fn find_stat_index(records: &[StatRecord], name: &str) -> Option<usize> {
    records.iter().position(|record| record.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsStore {
    path: PathBuf,
    format: StatsFormat,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_format(path, StatsFormat::Pipe)
    }

    pub fn with_format(path: impl Into<PathBuf>, format: StatsFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StatsFormat {
        self.format
    }

    /// A missing file is an empty ledger, not an error.
    pub fn try_load(&self) -> Result<Vec<StatRecord>, StatsError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StatsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.format.decode_bytes(&raw).map_err(|source| StatsError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub fn try_save(&self, records: &[StatRecord]) -> Result<(), StatsError> {
        let kept = &records[..records.len().min(MAX_STAT_RECORDS)];
        let payload = self.format.encode(kept).map_err(|source| StatsError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, payload).map_err(|source| StatsError::Io {
            path: self.path.clone(),
            source,
        })
    }

    pub fn load(&self) -> Vec<StatRecord> {
        self.try_load().unwrap_or_else(|err| {
            tracing::warn!(%err, "stats unreadable, starting from an empty ledger");
            Vec::new()
        })
    }

    pub fn save(&self, records: &[StatRecord]) {
        if let Err(err) = self.try_save(records) {
            tracing::warn!(%err, "stats not saved");
        }
    }

    /// Adds one win or loss for `name`, creating the record on first sight.
    /// A new name is dropped when the ledger is already full.
    pub fn bump(&self, name: &str, is_win: bool) {
        let name = sanitize_name(name);
        let name = name.as_str();
        let mut records = self.load();
        let index = match find_stat_index(&records, name) {
            Some(index) => index,
            None if records.len() >= MAX_STAT_RECORDS => {
                tracing::warn!(name, "stats ledger full, result not recorded");
                return;
            }
            None => {
                records.push(StatRecord::new(name));
                records.len() - 1
            }
        };

        let record = &mut records[index];
        if is_win {
            record.wins = record.wins.saturating_add(1);
        } else {
            record.losses = record.losses.saturating_add(1);
        }
        tracing::debug!(name, is_win, wins = record.wins, losses = record.losses, "stats bumped");
        self.save(&records);
    }

    pub fn record_win(&self, name: &str) {
        self.bump(name, true);
    }

    pub fn record_loss(&self, name: &str) {
        self.bump(name, false);
    }

    /// Winner gets a win, loser a loss; a draw changes nothing.
    pub fn record_outcome(&self, report: &DuelReport) {
        let (Some(winner), Some(loser)) = (report.outcome.winner(), report.outcome.loser()) else {
            debug_assert_eq!(report.outcome, DuelOutcome::Draw);
            return;
        };
        self.record_win(&report.side(winner).name);
        self.record_loss(&report.side(loser).name);
    }

    pub fn lookup(&self, name: &str) -> Option<StatRecord> {
        let records = self.load();
        find_stat_index(&records, &sanitize_name(name)).map(|index| records[index].clone())
    }
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_PATH)
    }
}
