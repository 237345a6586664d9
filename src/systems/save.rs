use std::error::Error;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cards::Colorway;
use crate::components::{ReadingNotes, TableContext, TarotCard};

const SAVE_FILE: &str = "arcana_readings.json";

/// The persisted record of one completed deal: enough to re-derive the whole
/// spread (seed + spread id) plus what the user typed alongside it.
#[derive(Serialize, Deserialize, Clone)]
pub struct SavedReading {
    pub when: String,
    pub spread_id: String,
    pub seed: String,
    pub colorway: Colorway,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub question: String,
    #[serde(default)]
    pub meta: ReadingMeta,
    pub cards: Vec<SavedCard>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct ReadingMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub focus: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub choice1: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub choice2: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SavedCard {
    pub id: String,
    pub reversed: bool,
    pub slot_key: String,
}

pub fn save_reading_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    ctx: Res<TableContext>,
    notes: Res<ReadingNotes>,
    cards: Query<&TarotCard>,
) {
    if !keyboard.just_pressed(KeyCode::KeyS) || ctx.dealing {
        return;
    }
    let Some(seed) = ctx.last_seed.clone() else {
        warn!("no reading on the table to save");
        return;
    };
    let mut dealt: Vec<&TarotCard> = cards.iter().collect();
    if dealt.is_empty() {
        warn!("no reading on the table to save");
        return;
    }
    dealt.sort_by_key(|card| card.deal_index);

    let reading = SavedReading {
        when: Utc::now().to_rfc3339(),
        spread_id: ctx.spread.id.to_string(),
        seed,
        colorway: ctx.colorway,
        question: notes.question.clone(),
        meta: ReadingMeta {
            focus: notes.focus.clone(),
            choice1: notes.choice1.clone(),
            choice2: notes.choice2.clone(),
        },
        cards: dealt
            .iter()
            .map(|card| SavedCard {
                id: card.card_id.to_string(),
                reversed: card.reversed,
                slot_key: card.slot_key.to_string(),
            })
            .collect(),
    };

    match append_reading(Path::new(SAVE_FILE), reading) {
        Ok(count) => info!("reading saved ({count} stored)"),
        Err(err) => warn!("failed to save reading: {err}"),
    }
}

/// Newest first, like a journal.
pub fn append_reading(path: &Path, reading: SavedReading) -> Result<usize, Box<dyn Error>> {
    let mut list: Vec<SavedReading> = match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => Vec::new(),
    };
    list.insert(0, reading);
    fs::write(path, serde_json::to_string_pretty(&list)?)?;
    Ok(list.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(seed: &str) -> SavedReading {
        SavedReading {
            when: "2026-08-06T00:00:00+00:00".to_string(),
            spread_id: "ppf".to_string(),
            seed: seed.to_string(),
            colorway: Colorway::Pink,
            question: String::new(),
            meta: ReadingMeta::default(),
            cards: vec![SavedCard {
                id: "13.Birth".to_string(),
                reversed: true,
                slot_key: "past-3".to_string(),
            }],
        }
    }

    #[test]
    fn readings_append_newest_first() {
        let path = std::env::temp_dir().join(format!(
            "arcana_readings_test_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        assert_eq!(append_reading(&path, reading("reading-1")).unwrap(), 1);
        assert_eq!(append_reading(&path, reading("reading-2")).unwrap(), 2);

        let raw = fs::read_to_string(&path).unwrap();
        let list: Vec<SavedReading> = serde_json::from_str(&raw).unwrap();
        assert_eq!(list[0].seed, "reading-2");
        assert_eq!(list[1].seed, "reading-1");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn record_shape_round_trips() {
        let json = serde_json::to_string(&reading("reading-42")).unwrap();
        assert!(json.contains("\"spread_id\":\"ppf\""));
        assert!(json.contains("\"colorway\":\"pink\""));
        // Empty free-text fields stay out of the record.
        assert!(!json.contains("question"));
        let back: SavedReading = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, "reading-42");
        assert_eq!(
            back.cards[0],
            SavedCard {
                id: "13.Birth".to_string(),
                reversed: true,
                slot_key: "past-3".to_string(),
            }
        );
    }
}
