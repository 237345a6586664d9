use bevy::prelude::*;

use crate::components::{
    CardBody, SlotLabel, TableContext, TarotCard, ZoomState, CARD_H, CARD_W, ZOOMED_Z,
};
use crate::systems::profiles::compute_zoom_scale;
use crate::systems::tween::{Fade, FlipTween, ZoomTween, ZOOM_IN_SECS, ZOOM_OUT_SECS};

/// What a pointer-down on a card resolves to. Routing is synchronous against
/// current state, so two rapid clicks cannot both win the same transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickAction {
    Flip,
    ZoomIn,
    ZoomOut,
    SwapFocus,
    Ignore,
}

/// The transition table. A face-down card always flips before any zoom
/// consideration; a mid-flip card swallows the click.
pub fn route_click(
    face_up: bool,
    mid_flip: bool,
    clicked_is_zoomed: bool,
    any_zoomed: bool,
) -> ClickAction {
    if mid_flip {
        return ClickAction::Ignore;
    }
    if !face_up {
        return ClickAction::Flip;
    }
    if !any_zoomed {
        return ClickAction::ZoomIn;
    }
    if clicked_is_zoomed {
        ClickAction::ZoomOut
    } else {
        // Policy: clicking another card while one is zoomed swaps focus.
        ClickAction::SwapFocus
    }
}

pub type CardQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static mut TarotCard, &'static mut Transform, &'static CardBody)>;
pub type LabelQuery<'w, 's> = Query<'w, 's, (Entity, &'static Text), With<SlotLabel>>;

fn card_alpha(entity: Entity, children: &Query<&Children>, sprites: &Query<&Sprite>) -> f32 {
    if let Ok(kids) = children.get(entity) {
        for kid in kids.iter() {
            if let Ok(sprite) = sprites.get(*kid) {
                return sprite.color.to_srgba().alpha;
            }
        }
    }
    1.0
}

fn fade_siblings(
    commands: &mut Commands,
    cards: &mut CardQuery,
    children: &Query<&Children>,
    sprites: &Query<&Sprite>,
    keep: Entity,
    to: f32,
) {
    for (other, mut card, _, _) in cards.iter_mut() {
        if other == keep {
            continue;
        }
        card.pickable = to > 0.0;
        let from = card_alpha(other, children, sprites);
        if (from - to).abs() < 1e-3 {
            continue;
        }
        commands.entity(other).insert(Fade::new(from, to));
    }
}

fn fade_labels(commands: &mut Commands, labels: &LabelQuery, to: f32) {
    for (entity, text) in labels.iter() {
        let from = text
            .sections
            .first()
            .map(|s| s.style.color.to_srgba().alpha)
            .unwrap_or(1.0);
        if (from - to).abs() < 1e-3 {
            continue;
        }
        commands.entity(entity).insert(Fade::new(from, to));
    }
}

/// Reveal a face-down card. Any pending zoom for this card is cancelled and
/// the scale normalized first, so the flip always starts from the base pose.
pub fn start_flip(
    commands: &mut Commands,
    cards: &mut CardQuery,
    ctx: &TableContext,
    entity: Entity,
) {
    let Ok((_, mut card, mut transform, _)) = cards.get_mut(entity) else {
        return;
    };
    card.zoom = ZoomState::Normal;
    transform.scale = Vec3::new(ctx.base_scale, ctx.base_scale, 1.0);
    transform.translation.z = card.base_z();
    commands
        .entity(entity)
        .remove::<ZoomTween>()
        .insert(FlipTween::new(ctx.base_scale));
}

/// Enlarge a card to screen center; siblings and the label overlay fade out
/// and stop taking clicks.
pub fn start_zoom_in(
    commands: &mut Commands,
    ctx: &mut TableContext,
    cards: &mut CardQuery,
    children: &Query<&Children>,
    sprites: &Query<&Sprite>,
    labels: &LabelQuery,
    viewport: Vec2,
    entity: Entity,
) {
    {
        let Ok((_, mut card, mut transform, _)) = cards.get_mut(entity) else {
            return;
        };
        // Uniform scale before computing the fit.
        let current = transform.scale.x.max(transform.scale.y);
        transform.scale = Vec3::new(current, current, 1.0);
        let rendered = Vec2::new(CARD_W, CARD_H) * current;
        let to_scale = compute_zoom_scale(current, rendered, viewport, ctx.device);
        let from_pos = transform.translation.truncate();
        transform.translation.z = ZOOMED_Z;
        card.zoom = ZoomState::Zoomed;
        commands.entity(entity).insert(ZoomTween::new(
            ZOOM_IN_SECS,
            current,
            to_scale,
            from_pos,
            Vec2::ZERO,
        ));
    }
    ctx.zoomed = Some(entity);
    fade_siblings(commands, cards, children, sprites, entity, 0.0);
    fade_labels(commands, labels, 0.0);
}

/// Return a zoomed card to its resting pose. The target comes from the
/// proxy's current position and the current base scale, so a resize that
/// happened while zoomed is honored.
pub fn start_zoom_out(
    commands: &mut Commands,
    ctx: &mut TableContext,
    cards: &mut CardQuery,
    children: &Query<&Children>,
    sprites: &Query<&Sprite>,
    labels: &LabelQuery,
    entity: Entity,
) {
    {
        let Ok((_, mut card, mut transform, body)) = cards.get_mut(entity) else {
            ctx.zoomed = None;
            return;
        };
        let current = transform.scale.x.max(transform.scale.y);
        let from_pos = transform.translation.truncate();
        transform.translation.z = card.base_z();
        card.zoom = ZoomState::Normal;
        commands.entity(entity).insert(ZoomTween::new(
            ZOOM_OUT_SECS,
            current,
            ctx.base_scale,
            from_pos,
            body.position,
        ));
    }
    ctx.zoomed = None;
    fade_siblings(commands, cards, children, sprites, entity, 1.0);
    fade_labels(commands, labels, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_down_always_flips_first() {
        assert_eq!(route_click(false, false, false, false), ClickAction::Flip);
        // Even while another card is zoomed, reveal wins over focus.
        assert_eq!(route_click(false, false, false, true), ClickAction::Flip);
    }

    #[test]
    fn mid_flip_clicks_are_swallowed() {
        assert_eq!(route_click(false, true, false, false), ClickAction::Ignore);
        assert_eq!(route_click(true, true, false, true), ClickAction::Ignore);
    }

    #[test]
    fn face_up_cycles_zoom() {
        assert_eq!(route_click(true, false, false, false), ClickAction::ZoomIn);
        assert_eq!(route_click(true, false, true, true), ClickAction::ZoomOut);
    }

    #[test]
    fn clicking_another_card_swaps_focus() {
        assert_eq!(route_click(true, false, false, true), ClickAction::SwapFocus);
    }
}
