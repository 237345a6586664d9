use std::f32::consts::PI;

use bevy::prelude::*;

use crate::components::{CardBack, CardBody, CardFace, TarotCard, ZoomState};
use crate::systems::tween::ZoomTween;

// Resting rotation; reversal reads as the card lying upside down.
pub fn visual_angle(body_angle: f32, reversed: bool) -> f32 {
    if reversed {
        body_angle + PI
    } else {
        body_angle
    }
}

/// The single physics-to-visual writer. Position and rotation copy from the
/// proxy every frame unless the zoom owns the visual (mid-tween or parked at
/// screen center); face/back visibility copies unconditionally, it is cheap
/// and must never desync.
pub fn frame_sync_system(
    mut cards: Query<(
        &CardBody,
        &TarotCard,
        &mut Transform,
        &Children,
        Option<&ZoomTween>,
    )>,
    mut faces: Query<&mut Visibility, (With<CardFace>, Without<CardBack>)>,
    mut backs: Query<&mut Visibility, (With<CardBack>, Without<CardFace>)>,
) {
    for (body, card, mut transform, children, zoom) in cards.iter_mut() {
        let suppressed = zoom.is_some() || card.zoom == ZoomState::Zoomed;
        if !suppressed {
            transform.translation.x = body.position.x;
            transform.translation.y = body.position.y;
            transform.rotation = Quat::from_rotation_z(visual_angle(body.angle, card.reversed));
        }

        for child in children.iter() {
            if let Ok(mut visibility) = faces.get_mut(*child) {
                *visibility = if card.face_up {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
            } else if let Ok(mut visibility) = backs.get_mut(*child) {
                *visibility = if card.face_up {
                    Visibility::Hidden
                } else {
                    Visibility::Inherited
                };
            }
        }
    }
}
