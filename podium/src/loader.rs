use std::path::PathBuf;
use std::string::String;
use std::vec::Vec;

use serde::Deserialize;

use crate::{Entity, LoadError};

#[derive(Debug, Default, Deserialize)]
struct RosterDocument {
    #[serde(default)]
    players: Option<Vec<RosterRecord>>,
}

#[derive(Debug, Deserialize)]
struct RosterRecord {
    id: String,
    #[serde(default, alias = "nickname")]
    label: String,
    #[serde(default)]
    score: i64,
}

impl From<RosterRecord> for Entity {
    fn from(record: RosterRecord) -> Self {
        let score = u32::try_from(record.score.max(0)).unwrap_or(u32::MAX);
        Entity::new(record.id, record.label, score)
    }
}

/// Parses a roster document: `{"players": [{"id": .., "label": .., "score": ..}]}`.
///
/// `nickname` is accepted in place of `label`; negative scores are clamped to zero.
pub fn try_parse_roster(text: &str) -> Result<Vec<Entity>, LoadError> {
    let doc: RosterDocument = serde_json::from_str(text)?;
    Ok(doc
        .players
        .unwrap_or_default()
        .into_iter()
        .map(Entity::from)
        .collect())
}

/// Like [`try_parse_roster`], but any failure yields an empty roster.
pub fn parse_roster(text: &str) -> Vec<Entity> {
    try_parse_roster(text).unwrap_or_else(|_err| {
        pwarn!(error = %_err, "parse_roster: malformed roster document");
        Vec::new()
    })
}

/// Where a roster document comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterSource {
    File(PathBuf),
    Text(String),
}

impl RosterSource {
    fn read(&self) -> Result<String, LoadError> {
        match self {
            Self::File(path) => Ok(std::fs::read_to_string(path)?),
            Self::Text(text) => Ok(text.clone()),
        }
    }

    pub fn try_load(&self) -> Result<Vec<Entity>, LoadError> {
        try_parse_roster(&self.read()?)
    }

    /// Loads the roster, treating unreadable or malformed input as an empty roster.
    pub fn load(&self) -> Vec<Entity> {
        self.try_load().unwrap_or_else(|_err| {
            pwarn!(source = ?self, error = %_err, "RosterSource::load failed");
            Vec::new()
        })
    }
}

/// Loads from the first source that has any content.
///
/// Sources are tried in order (e.g. an explicit file, then inline text, then a bundled default);
/// a missing file or blank text is skipped. With nothing available the roster is empty.
pub fn load_first(sources: &[RosterSource]) -> Vec<Entity> {
    for source in sources {
        let text = match source.read() {
            Ok(text) => text,
            Err(_err) => {
                pdebug!(source = ?source, error = %_err, "load_first: skipping source");
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        pdebug!(source = ?source, "load_first: using source");
        return parse_roster(&text);
    }
    parse_roster("{}")
}
