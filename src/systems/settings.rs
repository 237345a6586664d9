use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cards::Colorway;
use crate::components::TableContext;
use crate::spreads::all_spreads;

const SETTINGS_FILE: &str = "arcana_settings.json";

#[derive(Serialize, Deserialize, Resource, Clone)]
pub struct UserSettings {
    pub colorway: Colorway,
    pub spread_id: String,
    /// Pinned seed for reproducible readings. None draws a fresh seed per
    /// deal.
    pub seed: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            colorway: Colorway::default(),
            spread_id: "ppf".to_string(),
            seed: None,
        }
    }
}

impl UserSettings {
    pub fn load_or_default() -> Self {
        match std::fs::read_to_string(SETTINGS_FILE) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = std::fs::write(SETTINGS_FILE, json);
        }
    }
}

pub fn initialize_settings_system(mut commands: Commands, mut ctx: ResMut<TableContext>) {
    let settings = UserSettings::load_or_default();
    ctx.colorway = settings.colorway;
    ctx.seed_override = settings.seed.clone();
    if let Some(spread) = all_spreads()
        .into_iter()
        .find(|s| s.id == settings.spread_id)
    {
        ctx.spread = spread;
    }
    commands.insert_resource(settings);
}

/// Keeps the settings file in step with in-session choices.
pub fn persist_settings_system(ctx: Res<TableContext>, mut settings: ResMut<UserSettings>) {
    if settings.colorway == ctx.colorway && settings.spread_id == ctx.spread.id {
        return;
    }
    settings.colorway = ctx.colorway;
    settings.spread_id = ctx.spread.id.to_string();
    settings.save();
}
