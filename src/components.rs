use bevy::prelude::*;

use crate::cards::Colorway;
use crate::spreads::SpreadDef;
use crate::systems::profiles::DeviceClass;

// Intrinsic (unscaled) card art dimensions in pixels.
pub const CARD_W: f32 = 200.0;
pub const CARD_H: f32 = 300.0;

// Z layering: backdrop < cards < labels < zoomed card.
pub const CARD_Z: f32 = 1.0;
pub const LABEL_Z: f32 = 100.0;
pub const ZOOMED_Z: f32 = 200.0;

/// Absolute world-space destination for a deal tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DealTarget {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

/// The card's physics proxy: a rectangular pose record that owns the card's
/// resting position. Free from spawn until the deal tween seats it, pinned
/// static afterwards. Card bodies are sensors and never collide with each
/// other.
#[derive(Component)]
pub struct CardBody {
    pub position: Vec2,
    pub angle: f32,
    pub half_extents: Vec2,
    pub pinned: bool,
    pub is_sensor: bool,
}

impl CardBody {
    pub fn new(position: Vec2, scale: f32) -> Self {
        Self {
            position,
            angle: 0.0,
            half_extents: Vec2::new(CARD_W, CARD_H) * scale * 0.5,
            pinned: false,
            is_sensor: true,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (point.x - self.position.x).abs() <= self.half_extents.x
            && (point.y - self.position.y).abs() <= self.half_extents.y
    }

    pub fn rescale(&mut self, ratio: f32) {
        self.half_extents *= ratio;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomState {
    #[default]
    Normal,
    Zoomed,
}

/// One dealt card. `face_up` is the authoritative flip state and toggles
/// exactly once per flip, at the animation midpoint.
#[derive(Component)]
pub struct TarotCard {
    pub card_id: &'static str,
    pub reversed: bool,
    pub slot_key: &'static str,
    pub face_up: bool,
    pub zoom: ZoomState,
    pub pickable: bool,
    pub deal_index: usize,
}

impl TarotCard {
    pub fn new(
        card_id: &'static str,
        reversed: bool,
        slot_key: &'static str,
        deal_index: usize,
    ) -> Self {
        Self {
            card_id,
            reversed,
            slot_key,
            face_up: false,
            zoom: ZoomState::Normal,
            pickable: true,
            deal_index,
        }
    }

    pub fn base_z(&self) -> f32 {
        CARD_Z + self.deal_index as f32 * 0.01
    }
}

#[derive(Component)]
pub struct CardFace;

#[derive(Component)]
pub struct CardBack;

/// Overlay label for a slot, kept outside the card hierarchy so its rotation
/// stays independent of the card's.
#[derive(Component)]
pub struct SlotLabel {
    pub card: Entity,
}

#[derive(Component)]
pub struct MarkedForDespawn;

/// Shared mutable state for the whole table, single writer per field: the
/// resolver owns `device`/`base_scale`, the interaction machine owns
/// `zoomed`, the deal orchestrator owns `dealing` and the seeds.
#[derive(Resource)]
pub struct TableContext {
    pub device: DeviceClass,
    pub base_scale: f32,
    pub zoomed: Option<Entity>,
    pub dealing: bool,
    pub seed_override: Option<String>,
    pub last_seed: Option<String>,
    pub colorway: Colorway,
    pub spread: SpreadDef,
}

impl Default for TableContext {
    fn default() -> Self {
        Self {
            device: DeviceClass::Desktop,
            base_scale: 1.0,
            zoomed: None,
            dealing: false,
            seed_override: None,
            last_seed: None,
            colorway: Colorway::default(),
            spread: crate::spreads::all_spreads().remove(0),
        }
    }
}

/// Free-text accompaniment for the current reading. The widgets that fill
/// these in live outside the core; the fields ride along into persistence.
#[derive(Resource, Default)]
pub struct ReadingNotes {
    pub question: String,
    pub focus: String,
    pub choice1: String,
    pub choice2: String,
}

#[derive(Event)]
pub struct DealRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealError {
    EmptyCatalog,
    ArtLoadFailed,
}

#[derive(Event)]
pub struct DealFailed(pub DealError);

#[derive(Event)]
pub struct ColorwayChanged;
