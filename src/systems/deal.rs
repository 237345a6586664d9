use bevy::asset::LoadState;
use bevy::prelude::*;
use chrono::Utc;

use crate::cards::{back_art_path, front_art_path, DeckCatalog};
use crate::components::{
    CardBack, CardBody, CardFace, ColorwayChanged, DealError, DealFailed, DealRequest, DealTarget,
    MarkedForDespawn, SlotLabel, TableContext, TarotCard, CARD_H, CARD_W,
};
use crate::spreads::{slots_for_device, SpreadSlot};
use crate::systems::background::Backdrop;
use crate::systems::generator::pick_cards;
use crate::systems::labels::{label_anchor, spawn_label};
use crate::systems::profiles::{apply_layout_overrides, compute_base_scale, targets_from_slots};
use crate::systems::tween::DealTween;

/// One slot's card for the current deal.
#[derive(Clone, Copy, Debug)]
pub struct Assignment {
    pub slot_key: &'static str,
    pub card_id: &'static str,
    pub reversed: bool,
}

/// The deal pipeline's suspension points, made explicit: request validation
/// happens in `Idle`, art residency is awaited in `Loading`, and `Dealing`
/// serializes one tween per card.
#[derive(Resource, Default)]
pub enum DealPhase {
    #[default]
    Idle,
    Loading,
    Dealing {
        next: usize,
    },
}

#[derive(Resource, Default)]
pub struct PendingDeal {
    pub assignments: Vec<Assignment>,
    pub slots: Vec<SpreadSlot>,
    pub targets: Vec<DealTarget>,
    pub art: Vec<Handle<Image>>,
}

impl PendingDeal {
    fn clear(&mut self) {
        self.assignments.clear();
        self.slots.clear();
        self.targets.clear();
        self.art.clear();
    }
}

/// Where newly dealt cards start: bottom-center, just past the visible frame
/// so they fly in upward.
pub fn spawn_point(viewport: Vec2) -> Vec2 {
    Vec2::new(0.0, -viewport.y / 2.0 - CARD_H * 0.9)
}

pub fn begin_deal_system(
    mut requests: EventReader<DealRequest>,
    mut commands: Commands,
    mut ctx: ResMut<TableContext>,
    mut phase: ResMut<DealPhase>,
    mut pending: ResMut<PendingDeal>,
    mut backdrop: ResMut<Backdrop>,
    mut failures: EventWriter<DealFailed>,
    catalog: Res<DeckCatalog>,
    asset_server: Res<AssetServer>,
    windows: Query<&Window>,
    cards: Query<Entity, With<TarotCard>>,
    labels: Query<Entity, With<SlotLabel>>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();
    if ctx.dealing {
        return;
    }
    // Fail fast before touching any existing state.
    if catalog.ids.is_empty() {
        error!("no cards in the catalog; deal aborted");
        failures.send(DealFailed(DealError::EmptyCatalog));
        return;
    }

    let window = windows.single();
    let viewport = Vec2::new(window.width(), window.height());

    backdrop.request_gradient();

    // The previous spread goes away wholesale; tweens die with the entities.
    for entity in cards.iter().chain(labels.iter()) {
        commands.entity(entity).insert(MarkedForDespawn);
    }
    ctx.zoomed = None;
    ctx.dealing = true;

    let slots = slots_for_device(&ctx.spread, ctx.device);
    let seed = ctx
        .seed_override
        .clone()
        .unwrap_or_else(|| format!("reading-{}", Utc::now().timestamp_millis()));
    let picks = pick_cards(&seed, slots.len(), &catalog.ids);
    let assignments: Vec<Assignment> = picks
        .iter()
        .zip(slots.iter())
        .map(|(pick, slot)| Assignment {
            slot_key: slot.id_key,
            card_id: pick.card_id,
            reversed: pick.reversed,
        })
        .collect();

    let mut targets = targets_from_slots(&slots, viewport);
    apply_layout_overrides(ctx.device, ctx.spread.id, &mut targets, viewport);

    // Back art first, then one front per assignment, awaited before any
    // entity exists.
    let mut art = vec![asset_server.load(back_art_path(ctx.colorway))];
    for assignment in &assignments {
        art.push(asset_server.load(front_art_path(assignment.card_id, ctx.colorway)));
    }

    info!(
        "dealing {} cards for spread '{}' (seed {})",
        assignments.len(),
        ctx.spread.id,
        seed
    );
    ctx.last_seed = Some(seed);

    pending.assignments = assignments;
    pending.slots = slots;
    pending.targets = targets;
    pending.art = art;
    *phase = DealPhase::Loading;
}

pub fn poll_deal_assets_system(
    mut commands: Commands,
    mut ctx: ResMut<TableContext>,
    mut phase: ResMut<DealPhase>,
    mut pending: ResMut<PendingDeal>,
    mut failures: EventWriter<DealFailed>,
    asset_server: Res<AssetServer>,
    catalog: Res<DeckCatalog>,
    windows: Query<&Window>,
) {
    if !matches!(*phase, DealPhase::Loading) {
        return;
    }

    for handle in &pending.art {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {}
            Some(LoadState::Failed(_)) => {
                error!("card art failed to load; deal aborted");
                failures.send(DealFailed(DealError::ArtLoadFailed));
                pending.clear();
                ctx.dealing = false;
                *phase = DealPhase::Idle;
                return;
            }
            _ => return, // still loading
        }
    }

    if pending.assignments.is_empty() {
        ctx.dealing = false;
        *phase = DealPhase::Idle;
        return;
    }

    let window = windows.single();
    let viewport = Vec2::new(window.width(), window.height());
    let spawn = spawn_point(viewport);
    // Pre-scale at creation so there is no first-frame flash at the wrong
    // size.
    let prescale = viewport.x * ctx.device.base_width_rel() / CARD_W;
    ctx.base_scale = prescale;

    let back = pending.art[0].clone();
    let mut first_card = None;
    for (i, assignment) in pending.assignments.iter().enumerate() {
        let front = pending.art[i + 1].clone();
        let card = TarotCard::new(assignment.card_id, assignment.reversed, assignment.slot_key, i);
        let z = card.base_z();
        let entity = commands
            .spawn((
                SpatialBundle::from_transform(
                    Transform::from_translation(spawn.extend(z))
                        .with_scale(Vec3::new(prescale, prescale, 1.0)),
                ),
                card,
                CardBody::new(spawn, prescale),
            ))
            .with_children(|parent| {
                parent.spawn((
                    SpriteBundle {
                        texture: front,
                        sprite: Sprite {
                            custom_size: Some(Vec2::new(CARD_W, CARD_H)),
                            ..default()
                        },
                        visibility: Visibility::Hidden,
                        ..default()
                    },
                    CardFace,
                ));
                parent.spawn((
                    SpriteBundle {
                        texture: back.clone(),
                        sprite: Sprite {
                            custom_size: Some(Vec2::new(CARD_W, CARD_H)),
                            ..default()
                        },
                        ..default()
                    },
                    CardBack,
                ));
            })
            .id();
        spawn_label(
            &mut commands,
            entity,
            &pending.slots[i].label,
            label_anchor(spawn, prescale, false),
        );
        debug!(
            "slot {} gets {}{}",
            assignment.slot_key,
            catalog
                .display_name(assignment.card_id)
                .unwrap_or(assignment.card_id),
            if assignment.reversed { " (reversed)" } else { "" }
        );
        if i == 0 {
            first_card = Some(entity);
        }
    }

    if let Some(first) = first_card {
        let target = pending.targets[0];
        commands.entity(first).insert(DealTween::new(
            spawn,
            0.0,
            Vec2::new(target.x, target.y),
            target.angle,
        ));
    }
    *phase = DealPhase::Dealing { next: 0 };
}

/// One card in flight at a time: when the current tween completes, the next
/// card launches; after the last one, base scale is recomputed once more to
/// cover any viewport change that happened mid-deal.
pub fn sequence_deal_system(
    mut commands: Commands,
    mut ctx: ResMut<TableContext>,
    mut phase: ResMut<DealPhase>,
    mut pending: ResMut<PendingDeal>,
    mut cards: Query<(Entity, &TarotCard, &mut CardBody, &mut Transform)>,
    windows: Query<&Window>,
) {
    let DealPhase::Dealing { next } = *phase else {
        return;
    };
    let Some(seated) = cards
        .iter()
        .find(|(_, card, ..)| card.deal_index == next)
        .map(|(_, _, body, _)| body.pinned)
    else {
        // Entities vanished under us (destroyed mid-deal); bail out cleanly.
        ctx.dealing = false;
        *phase = DealPhase::Idle;
        pending.clear();
        return;
    };
    if !seated {
        return; // still flying
    }

    if next + 1 < pending.assignments.len() {
        let follower = cards
            .iter()
            .find(|(_, card, ..)| card.deal_index == next + 1)
            .map(|(entity, _, body, _)| (entity, body.position, body.angle));
        if let Some((entity, position, angle)) = follower {
            let target = pending.targets[next + 1];
            commands.entity(entity).insert(DealTween::new(
                position,
                angle,
                Vec2::new(target.x, target.y),
                target.angle,
            ));
        }
        *phase = DealPhase::Dealing { next: next + 1 };
        return;
    }

    // All cards seated.
    let width = windows.single().width();
    if let Some(reference) = cards.iter().map(|(_, _, _, t)| t.scale.y).next() {
        let new_scale = compute_base_scale(reference, CARD_W * reference, width, ctx.device);
        for (_, _, mut body, mut transform) in cards.iter_mut() {
            let cur = transform.scale.y.max(f32::EPSILON);
            if (cur - new_scale).abs() > 1e-3 {
                transform.scale = Vec3::new(new_scale, new_scale, 1.0);
                body.rescale(new_scale / cur);
            }
        }
        ctx.base_scale = new_scale;
    }
    ctx.dealing = false;
    pending.clear();
    *phase = DealPhase::Idle;
    info!("deal complete");
}

/// Colorway changes retexture dealt cards in place.
pub fn retexture_cards_system(
    mut events: EventReader<ColorwayChanged>,
    ctx: Res<TableContext>,
    asset_server: Res<AssetServer>,
    cards: Query<(&TarotCard, &Children)>,
    mut faces: Query<&mut Handle<Image>, (With<CardFace>, Without<CardBack>)>,
    mut backs: Query<&mut Handle<Image>, (With<CardBack>, Without<CardFace>)>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    for (card, children) in cards.iter() {
        for child in children.iter() {
            if let Ok(mut handle) = faces.get_mut(*child) {
                *handle = asset_server.load(front_art_path(card.card_id, ctx.colorway));
            } else if let Ok(mut handle) = backs.get_mut(*child) {
                *handle = asset_server.load(back_art_path(ctx.colorway));
            }
        }
    }
}
