//! File-backed high-score persistence: two scalar slots in a small JSON
//! document. Reads treat anything missing or malformed as zero, and writes
//! are best-effort; gameplay never fails because of the score file.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use meteors_core::sim::{ScoreSlot, ScoreStore};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    best_time: u32,
    #[serde(default)]
    best_score: u32,
}

pub struct JsonScoreStore {
    path: PathBuf,
    slots: ScoreFile,
}

impl JsonScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let slots = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(parsed) => parsed,
                Err(err) => {
                    log::warn!("ignoring malformed score file {}: {err}", path.display());
                    ScoreFile::default()
                }
            },
            // A missing file simply reads as zeros.
            Err(_) => ScoreFile::default(),
        };
        Self { path, slots }
    }

    fn write_out(&self) {
        match serde_json::to_string_pretty(&self.slots) {
            Ok(text) => {
                if let Err(err) = fs::write(&self.path, text) {
                    log::warn!("failed to persist scores to {}: {err}", self.path.display());
                }
            }
            Err(err) => log::warn!("failed to encode score file: {err}"),
        }
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self, slot: ScoreSlot) -> u32 {
        match slot {
            ScoreSlot::BestTime => self.slots.best_time,
            ScoreSlot::BestScore => self.slots.best_score,
        }
    }

    fn save(&mut self, slot: ScoreSlot, value: u32) {
        match slot {
            ScoreSlot::BestTime => self.slots.best_time = value,
            ScoreSlot::BestScore => self.slots.best_score = value,
        }
        self.write_out();
    }
}
