use bevy::prelude::*;

use crate::components::{CardBody, SlotLabel, TarotCard};
use crate::systems::labels::label_anchor;

pub const DEAL_SECS: f32 = 0.65;
pub const FLIP_SECS: f32 = 0.26;
pub const ZOOM_IN_SECS: f32 = 0.4;
pub const ZOOM_OUT_SECS: f32 = 0.25;
pub const FADE_SECS: f32 = 0.3;

pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Moves a card's physics proxy from the spawn point to its slot. One per
/// card, strictly sequenced by the deal orchestrator. Completion pins the
/// proxy; the tween also trails the slot label behind the card and fades it
/// in over progress 0.15..0.35.
#[derive(Component)]
pub struct DealTween {
    pub timer: Timer,
    pub from: Vec2,
    pub to: Vec2,
    pub from_angle: f32,
    pub to_angle: f32,
}

impl DealTween {
    pub fn new(from: Vec2, from_angle: f32, to: Vec2, to_angle: f32) -> Self {
        Self {
            timer: Timer::from_seconds(DEAL_SECS, TimerMode::Once),
            from,
            to,
            from_angle,
            to_angle,
        }
    }
}

/// Horizontal squash-to-zero-and-back. The face/back swap happens exactly
/// once, at the boundary between the two halves.
#[derive(Component)]
pub struct FlipTween {
    pub timer: Timer,
    pub base_scale: f32,
    pub swapped: bool,
}

impl FlipTween {
    pub fn new(base_scale: f32) -> Self {
        Self {
            timer: Timer::from_seconds(FLIP_SECS, TimerMode::Once),
            base_scale,
            swapped: false,
        }
    }
}

/// Scale + position of the visual node during zoom and unzoom. While present
/// it owns the card's visual position; the frame sync loop stays off it.
#[derive(Component)]
pub struct ZoomTween {
    pub timer: Timer,
    pub from_scale: f32,
    pub to_scale: f32,
    pub from_pos: Vec2,
    pub to_pos: Vec2,
}

impl ZoomTween {
    pub fn new(secs: f32, from_scale: f32, to_scale: f32, from_pos: Vec2, to_pos: Vec2) -> Self {
        Self {
            timer: Timer::from_seconds(secs, TimerMode::Once),
            from_scale,
            to_scale,
            from_pos,
            to_pos,
        }
    }
}

/// Alpha fade for a card (applied to its child sprites) or a label text.
#[derive(Component)]
pub struct Fade {
    pub timer: Timer,
    pub from: f32,
    pub to: f32,
}

impl Fade {
    pub fn new(from: f32, to: f32) -> Self {
        Self {
            timer: Timer::from_seconds(FADE_SECS, TimerMode::Once),
            from,
            to,
        }
    }
}

// Flip scale for progress t: x collapses over the first half and recovers
// over the second, y stays locked at the base scale.
pub(crate) fn flip_step(flip: &mut FlipTween, t: f32, face_up: &mut bool) -> (f32, f32) {
    let unit = if t < 0.5 { 1.0 - t / 0.5 } else { (t - 0.5) / 0.5 };
    if !flip.swapped && t >= 0.5 {
        *face_up = !*face_up;
        flip.swapped = true;
    }
    (unit.max(1e-4) * flip.base_scale, flip.base_scale)
}

pub fn deal_tween_system(
    time: Res<Time>,
    mut commands: Commands,
    mut cards: Query<(Entity, &mut CardBody, &Transform, &mut DealTween), With<TarotCard>>,
    mut labels: Query<(&SlotLabel, &mut Transform, &mut Text), Without<TarotCard>>,
) {
    for (entity, mut body, transform, mut tween) in cards.iter_mut() {
        tween.timer.tick(time.delta());
        let t = tween.timer.fraction();
        let k = ease_in_out_quad(t);
        body.position = tween.from.lerp(tween.to, k);
        body.angle = tween.from_angle + (tween.to_angle - tween.from_angle) * k;

        // The label trails under the card and fades in once it has moved a
        // little.
        let scale = transform.scale.y;
        for (label, mut label_transform, mut text) in labels.iter_mut() {
            if label.card != entity {
                continue;
            }
            let pos = label_anchor(body.position, scale, false);
            label_transform.translation.x = pos.x;
            label_transform.translation.y = pos.y;
            label_transform.rotation = Quat::IDENTITY;
            let alpha = if t >= 0.15 {
                ((t - 0.15) / 0.2).min(1.0)
            } else {
                0.0
            };
            for section in text.sections.iter_mut() {
                let mut color = section.style.color.to_srgba();
                color.alpha = alpha;
                section.style.color = Color::from(color);
            }
        }

        if tween.timer.finished() {
            body.position = tween.to;
            body.angle = tween.to_angle;
            body.pinned = true;
            commands.entity(entity).remove::<DealTween>();
        }
    }
}

pub fn flip_tween_system(
    time: Res<Time>,
    mut commands: Commands,
    mut cards: Query<(Entity, &mut Transform, &mut TarotCard, &mut FlipTween)>,
) {
    for (entity, mut transform, mut card, mut flip) in cards.iter_mut() {
        flip.timer.tick(time.delta());
        let t = flip.timer.fraction();
        let (sx, sy) = flip_step(&mut flip, t, &mut card.face_up);
        transform.scale.x = sx;
        transform.scale.y = sy;

        if flip.timer.finished() {
            transform.scale = Vec3::new(flip.base_scale, flip.base_scale, 1.0);
            commands.entity(entity).remove::<FlipTween>();
        }
    }
}

pub fn zoom_tween_system(
    time: Res<Time>,
    mut commands: Commands,
    mut cards: Query<(Entity, &mut Transform, &mut ZoomTween)>,
) {
    for (entity, mut transform, mut zoom) in cards.iter_mut() {
        zoom.timer.tick(time.delta());
        let k = ease_out_cubic(zoom.timer.fraction());
        let scale = zoom.from_scale + (zoom.to_scale - zoom.from_scale) * k;
        let pos = zoom.from_pos.lerp(zoom.to_pos, k);
        transform.scale.x = scale;
        transform.scale.y = scale;
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;

        if zoom.timer.finished() {
            commands.entity(entity).remove::<ZoomTween>();
        }
    }
}

pub fn fade_system(
    time: Res<Time>,
    mut commands: Commands,
    mut fades: Query<(Entity, &mut Fade)>,
    children_query: Query<&Children>,
    mut sprites: Query<&mut Sprite>,
    mut texts: Query<&mut Text>,
) {
    for (entity, mut fade) in fades.iter_mut() {
        fade.timer.tick(time.delta());
        let k = ease_out_cubic(fade.timer.fraction());
        let alpha = fade.from + (fade.to - fade.from) * k;

        if let Ok(children) = children_query.get(entity) {
            for child in children.iter() {
                if let Ok(mut sprite) = sprites.get_mut(*child) {
                    let mut color = sprite.color.to_srgba();
                    color.alpha = alpha;
                    sprite.color = Color::from(color);
                }
            }
        }
        if let Ok(mut text) = texts.get_mut(entity) {
            for section in text.sections.iter_mut() {
                let mut color = section.style.color.to_srgba();
                color.alpha = alpha;
                section.style.color = Color::from(color);
            }
        }

        if fade.timer.finished() {
            commands.entity(entity).remove::<Fade>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_hit_their_endpoints() {
        for ease in [ease_in_out_quad, ease_out_cubic] {
            assert!(ease(0.0).abs() < 1e-6);
            assert!((ease(1.0) - 1.0).abs() < 1e-6);
            // Monotonic over [0, 1].
            let mut prev = 0.0;
            for i in 1..=20 {
                let v = ease(i as f32 / 20.0);
                assert!(v >= prev);
                prev = v;
            }
        }
        // In-out quad is symmetric around the midpoint.
        assert!((ease_in_out_quad(0.25) + ease_in_out_quad(0.75) - 1.0).abs() < 1e-6);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn flip_toggles_face_exactly_once() {
        let mut flip = FlipTween::new(0.8);
        let mut face_up = false;
        let mut toggles = 0;
        let mut last = face_up;
        // Step through an arbitrary frame pattern, including several frames
        // past the midpoint.
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            flip_step(&mut flip, t, &mut face_up);
            if face_up != last {
                toggles += 1;
                last = face_up;
            }
        }
        assert_eq!(toggles, 1);
        assert!(face_up);
    }

    #[test]
    fn flip_collapses_x_and_locks_y() {
        let base = 0.6;
        let mut flip = FlipTween::new(base);
        let mut face_up = false;
        let (sx0, sy0) = flip_step(&mut flip, 0.0, &mut face_up);
        assert!((sx0 - base).abs() < 1e-5);
        assert!((sy0 - base).abs() < 1e-5);
        let (sx_mid, sy_mid) = flip_step(&mut flip, 0.5, &mut face_up);
        assert!(sx_mid <= 1e-3);
        assert!((sy_mid - base).abs() < 1e-5);
        let (sx1, sy1) = flip_step(&mut flip, 1.0, &mut face_up);
        assert!((sx1 - base).abs() < 1e-5);
        assert!((sy1 - base).abs() < 1e-5);
    }

    #[test]
    fn flip_with_coarse_frames_still_swaps_once() {
        // A hitchy frame schedule that jumps straight over the midpoint.
        let mut flip = FlipTween::new(1.0);
        let mut face_up = false;
        for t in [0.0, 0.49, 0.93, 1.0] {
            flip_step(&mut flip, t, &mut face_up);
        }
        assert!(face_up);
        assert!(flip.swapped);
    }
}
