use bevy::prelude::*;

use crate::components::{CardBody, SlotLabel, TableContext, TarotCard, CARD_H, CARD_W, LABEL_Z};
use crate::systems::profiles::DeviceClass;

pub const LABEL_FONT_SIZE: f32 = 14.0;
const BOTTOM_GAP: f32 = 15.0;
const SIDE_GAP: f32 = 5.0;

/// Vertically stacked spreads on narrow screens label to the right of the
/// card; everything else labels underneath.
pub fn side_labels(spread_id: &str, device: DeviceClass) -> bool {
    device == DeviceClass::Mobile && matches!(spread_id, "ppf" | "pphao" | "gsbbl")
}

pub fn label_anchor(card_pos: Vec2, scale: f32, side: bool) -> Vec2 {
    if side {
        Vec2::new(card_pos.x + (CARD_W * scale) / 2.0 + SIDE_GAP, card_pos.y)
    } else {
        Vec2::new(card_pos.x, card_pos.y - (CARD_H * scale) / 2.0 - BOTTOM_GAP)
    }
}

/// Labels live in their own overlay layer, never parented to the card, so
/// card rotation (reversal) leaves the text upright.
pub fn spawn_label(commands: &mut Commands, card: Entity, text: &str, pos: Vec2) -> Entity {
    commands
        .spawn((
            Text2dBundle {
                text: Text::from_section(
                    text,
                    TextStyle {
                        font_size: LABEL_FONT_SIZE,
                        color: Color::srgba(1.0, 1.0, 1.0, 0.0),
                        ..default()
                    },
                )
                .with_justify(JustifyText::Center),
                transform: Transform::from_translation(pos.extend(LABEL_Z)),
                ..default()
            },
            SlotLabel { card },
        ))
        .id()
}

/// Keeps labels glued to their cards outside of deals (resizes, rescales).
/// The deal tween owns label placement while cards are in flight.
pub fn reposition_labels_system(
    ctx: Res<TableContext>,
    cards: Query<(&CardBody, &Transform), With<TarotCard>>,
    mut labels: Query<(&SlotLabel, &mut Transform), Without<TarotCard>>,
) {
    if ctx.dealing {
        return;
    }
    let side = side_labels(ctx.spread.id, ctx.device);
    for (label, mut transform) in labels.iter_mut() {
        let Ok((body, card_transform)) = cards.get(label.card) else {
            continue;
        };
        let pos = label_anchor(body.position, card_transform.scale.y, side);
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
        transform.rotation = Quat::IDENTITY;
    }
}
