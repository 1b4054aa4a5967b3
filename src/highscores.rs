#![warn(clippy::all, clippy::pedantic)]

//! Ranked high score tables, one per ruleset, persisted as plain text
//! (`score,lines,level,name` per line).

use bevy_ecs::prelude::*;
use log::{error, info, warn};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::components::Rules;
use crate::game::{HIGH_SCORE_ENTRIES, NAME_CAP};
use crate::input::{KeyState, TypedKey};

const DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub unsaved: bool,
}

impl HighScoreEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, score: u32, lines: u32, level: u32) -> Self {
        Self {
            name: name.into(),
            score,
            lines,
            level,
            unsaved: false,
        }
    }
}

/// The ruleset a score was earned under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ruleset {
    Classic,
    Ghost,
    Hold,
    GhostHold,
}

impl Ruleset {
    pub const ALL: [Ruleset; 4] = [
        Ruleset::Classic,
        Ruleset::Ghost,
        Ruleset::Hold,
        Ruleset::GhostHold,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Ruleset::Classic => 0,
            Ruleset::Ghost => 1,
            Ruleset::Hold => 2,
            Ruleset::GhostHold => 3,
        }
    }

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Ruleset::Classic => "classic.txt",
            Ruleset::Ghost => "ghost.txt",
            Ruleset::Hold => "hold.txt",
            Ruleset::GhostHold => "ghost_hold.txt",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Ruleset::Classic => "Classic",
            Ruleset::Ghost => "Ghost",
            Ruleset::Hold => "Hold",
            Ruleset::GhostHold => "Ghost + Hold",
        }
    }
}

impl From<Rules> for Ruleset {
    fn from(rules: Rules) -> Self {
        match (rules.ghost_enabled, rules.hold_enabled) {
            (false, false) => Ruleset::Classic,
            (true, false) => Ruleset::Ghost,
            (false, true) => Ruleset::Hold,
            (true, true) => Ruleset::GhostHold,
        }
    }
}

// Errors raised while reading or writing score files
#[derive(Debug)]
pub enum HighScoreError {
    Io(io::Error),
    Parse { line: usize, reason: String },
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighScoreError::Io(err) => write!(f, "high score file error: {err}"),
            HighScoreError::Parse { line, reason } => {
                write!(f, "invalid high score on line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for HighScoreError {}

impl From<io::Error> for HighScoreError {
    fn from(err: io::Error) -> Self {
        HighScoreError::Io(err)
    }
}

fn parse_line(line: &str, line_number: usize) -> Result<HighScoreEntry, HighScoreError> {
    let invalid = |reason: &str| HighScoreError::Parse {
        line: line_number,
        reason: reason.to_string(),
    };
    // The name is everything after the third delimiter, commas included
    let mut parts = line.splitn(4, DELIMITER);
    let mut number = |field: &str| -> Result<u32, HighScoreError> {
        parts
            .next()
            .ok_or_else(|| invalid(&format!("missing {field}")))?
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid(&format!("{field} is not a number")))
    };
    let score = number("score")?;
    let lines = number("lines")?;
    let level = number("level")?;
    let name = parts.next().ok_or_else(|| invalid("missing name"))?;
    Ok(HighScoreEntry::new(name, score, lines, level))
}

/// Parses a score file. Stops at the first malformed line and ignores
/// anything past the table size, warning about both.
#[must_use]
pub fn parse_table(contents: &str, source: &str) -> Vec<HighScoreEntry> {
    let mut entries = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        if entries.len() >= HIGH_SCORE_ENTRIES {
            warn!("More than {HIGH_SCORE_ENTRIES} high scores found in {source:?}");
            break;
        }
        match parse_line(line, index + 1) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                warn!("Found invalid high score in {source:?}: {err}");
                break;
            }
        }
    }
    entries
}

#[must_use]
pub fn format_table(entries: &[HighScoreEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}\n",
                entry.score, entry.lines, entry.level, entry.name
            )
        })
        .collect()
}

/// Up to ten entries, best first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from already ordered entries, keeping the first ten
    #[must_use]
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.truncate(HIGH_SCORE_ENTRIES);
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < HIGH_SCORE_ENTRIES
            || self.entries.last().is_some_and(|lowest| lowest.score < score)
    }

    /// Inserts before the first lower score (or into the first free slot),
    /// shifting the rest down and dropping whatever falls off the end. The
    /// new entry is marked unsaved. Returns its position.
    pub fn insert(&mut self, mut entry: HighScoreEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        if position >= HIGH_SCORE_ENTRIES {
            return None;
        }
        entry.unsaved = true;
        self.entries.insert(position, entry);
        self.entries.truncate(HIGH_SCORE_ENTRIES);
        Some(position)
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&HighScoreEntry> {
        self.entries.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut HighScoreEntry> {
        self.entries.get_mut(position)
    }

    /// Reads a table from disk. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self, HighScoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::from_entries(parse_table(
                &contents,
                &path.display().to_string(),
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Truncates and rewrites the whole file
    pub fn save(&self, path: &Path) -> Result<(), HighScoreError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, format_table(&self.entries))?;
        Ok(())
    }
}

/// The four ruleset tables and where they live on disk
#[derive(Resource, Debug, Clone)]
pub struct HighScoreStore {
    dir: Option<PathBuf>,
    tables: [HighScoreTable; 4],
}

impl HighScoreStore {
    /// A store that never touches the filesystem
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            tables: Default::default(),
        }
    }

    /// Loads every table from `dir`. Unreadable tables start empty.
    #[must_use]
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let tables = Ruleset::ALL.map(|ruleset| {
            let path = dir.join(ruleset.file_name());
            match HighScoreTable::load(&path) {
                Ok(table) => {
                    info!(
                        "Loaded {} high scores for {}",
                        table.len(),
                        ruleset.title()
                    );
                    table
                }
                Err(err) => {
                    error!("Error reading high scores from {}: {err}", path.display());
                    HighScoreTable::new()
                }
            }
        });
        Self {
            dir: Some(dir),
            tables,
        }
    }

    #[must_use]
    pub fn path(&self, ruleset: Ruleset) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(ruleset.file_name()))
    }

    #[must_use]
    pub fn table(&self, ruleset: Ruleset) -> &HighScoreTable {
        &self.tables[ruleset.index()]
    }

    pub fn table_mut(&mut self, ruleset: Ruleset) -> &mut HighScoreTable {
        &mut self.tables[ruleset.index()]
    }

    #[must_use]
    pub fn qualifies(&self, ruleset: Ruleset, score: u32) -> bool {
        self.table(ruleset).qualifies(score)
    }

    pub fn insert(&mut self, ruleset: Ruleset, entry: HighScoreEntry) -> Option<usize> {
        self.table_mut(ruleset).insert(entry)
    }

    /// Writes one table. In-memory stores have nothing to do.
    pub fn save(&self, ruleset: Ruleset) -> Result<(), HighScoreError> {
        match self.path(ruleset) {
            Some(path) => self.table(ruleset).save(&path),
            None => Ok(()),
        }
    }

    /// Names the entry at `position`, clears its unsaved flag and persists
    /// the table. A failed write is logged; the in-memory table stays.
    pub fn commit_name(&mut self, ruleset: Ruleset, position: usize, name: &str) -> bool {
        let Some(entry) = self.table_mut(ruleset).get_mut(position) else {
            warn!("No high score at position {position} to name");
            return false;
        };
        entry.name = name.to_string();
        entry.unsaved = false;
        info!("High score saved for {name:?} in {}", ruleset.title());
        if let Err(err) = self.save(ruleset) {
            error!("Failed to write high scores for {}: {err}", ruleset.title());
        }
        true
    }
}

/// What a keystroke did to the name being typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameEntryEvent {
    Edited,
    Committed(String),
    Ignored,
}

/// Modal text capture for a fresh high score
#[derive(Resource, Debug, Clone, Default)]
pub struct NameEntry {
    target: Option<(Ruleset, usize)>,
    name: String,
    committed: bool,
}

impl NameEntry {
    pub fn begin(&mut self, ruleset: Ruleset, position: usize) {
        self.target = Some((ruleset, position));
        self.name.clear();
        self.committed = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.target.is_some() && !self.committed
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    #[must_use]
    pub fn target(&self) -> Option<(Ruleset, usize)> {
        self.target
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn accepts(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
    }

    /// Applies one keystroke
    pub fn push_key(&mut self, key: TypedKey) -> NameEntryEvent {
        if !self.is_capturing() {
            return NameEntryEvent::Ignored;
        }
        match key {
            TypedKey::Char(c) if Self::accepts(c) && self.name.chars().count() < NAME_CAP => {
                self.name.push(c);
                NameEntryEvent::Edited
            }
            TypedKey::Erase => {
                if self.name.pop().is_some() {
                    NameEntryEvent::Edited
                } else {
                    NameEntryEvent::Ignored
                }
            }
            TypedKey::Commit if !self.name.trim().is_empty() => {
                self.committed = true;
                NameEntryEvent::Committed(self.name.clone())
            }
            _ => NameEntryEvent::Ignored,
        }
    }

    /// Feeds every keystroke of the frame. Returns the name if one was
    /// committed.
    pub fn capture(&mut self, keys: &KeyState) -> Option<String> {
        for key in keys.typed() {
            if let NameEntryEvent::Committed(name) = self.push_key(key) {
                return Some(name);
            }
        }
        None
    }
}
