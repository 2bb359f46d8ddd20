use crate::career::SeasonRow;
use crate::error::Result;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 24] = [
    "SEASON", "TEAM", "AGE", "GP", "GS", "MIN", "PTS", "FGM", "FGA", "FG%", "3PM", "3PA", "3P%",
    "FTM", "FTA", "FT%", "OREB", "DREB", "REB", "AST", "STL", "BLK", "TOV", "PF",
];

/// Identity of a scraped player; renders as `"<name>, <position>"`, which is
/// also the output file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub name: String,
    pub position: String,
}

impl PlayerKey {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.position)
    }
}

#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &PlayerKey) -> PathBuf {
        self.dir.join(format!("{key}.csv"))
    }

    /// Writes the header and every row, replacing any file already stored
    /// under the same key.
    pub fn write(&self, key: &PlayerKey, rows: &[SeasonRow]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let mut wtr = WriterBuilder::new().flexible(true).from_path(&path)?;
        wtr.write_record(HEADER)?;
        for row in rows {
            wtr.write_record(row.fields())?;
        }
        wtr.flush()?;
        Ok(path)
    }
}
