use bevy::prelude::*;

use crate::components::{ColorwayChanged, DealRequest, TableContext};
use crate::spreads::all_spreads;
use crate::systems::interactions::{
    route_click, start_flip, start_zoom_in, start_zoom_out, CardQuery, ClickAction, LabelQuery,
};
use crate::systems::tween::FlipTween;

/// Pointer-down routing: find the topmost pickable card under the cursor and
/// feed it to the state machine; a miss while something is zoomed is the
/// global unzoom.
pub fn mouse_input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut commands: Commands,
    mut ctx: ResMut<TableContext>,
    mut cards: CardQuery,
    flipping: Query<(), With<FlipTween>>,
    children: Query<&Children>,
    sprites: Query<&Sprite>,
    labels: LabelQuery,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let window = windows.single();
    let (camera, camera_transform) = camera_q.single();
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let world = camera
        .viewport_to_world_2d(camera_transform, cursor)
        .unwrap_or(Vec2::ZERO);
    let viewport = Vec2::new(window.width(), window.height());

    // Topmost hit wins; later-dealt cards sit above earlier ones.
    let mut clicked: Option<(Entity, usize, bool)> = None;
    for (entity, card, _, body) in cards.iter() {
        if !card.pickable || !body.contains(world) {
            continue;
        }
        if clicked.map_or(true, |(_, index, _)| card.deal_index > index) {
            clicked = Some((entity, card.deal_index, card.face_up));
        }
    }

    match (clicked, ctx.zoomed) {
        (Some((entity, _, face_up)), zoomed) => {
            let action = route_click(
                face_up,
                flipping.get(entity).is_ok(),
                zoomed == Some(entity),
                zoomed.is_some(),
            );
            match action {
                ClickAction::Flip => start_flip(&mut commands, &mut cards, &ctx, entity),
                ClickAction::ZoomIn => start_zoom_in(
                    &mut commands,
                    &mut ctx,
                    &mut cards,
                    &children,
                    &sprites,
                    &labels,
                    viewport,
                    entity,
                ),
                ClickAction::ZoomOut => start_zoom_out(
                    &mut commands,
                    &mut ctx,
                    &mut cards,
                    &children,
                    &sprites,
                    &labels,
                    entity,
                ),
                ClickAction::SwapFocus => {
                    if let Some(current) = ctx.zoomed {
                        start_zoom_out(
                            &mut commands,
                            &mut ctx,
                            &mut cards,
                            &children,
                            &sprites,
                            &labels,
                            current,
                        );
                    }
                    start_zoom_in(
                        &mut commands,
                        &mut ctx,
                        &mut cards,
                        &children,
                        &sprites,
                        &labels,
                        viewport,
                        entity,
                    );
                }
                ClickAction::Ignore => {}
            }
        }
        // Click anywhere else while a card is zoomed: zoom it out.
        (None, Some(current)) => {
            if !ctx.dealing {
                start_zoom_out(
                    &mut commands,
                    &mut ctx,
                    &mut cards,
                    &children,
                    &sprites,
                    &labels,
                    current,
                );
            }
        }
        (None, None) => {}
    }
}

/// Keyboard stand-in for the hosting page's controls: Space/Enter deals,
/// 1-7 pick a spread, C toggles the colorway.
pub fn keyboard_controls_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut ctx: ResMut<TableContext>,
    mut deals: EventWriter<DealRequest>,
    mut colorway_events: EventWriter<ColorwayChanged>,
) {
    if keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::Enter) {
        deals.send(DealRequest);
    }

    const SPREAD_KEYS: [KeyCode; 7] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
    ];
    for (index, key) in SPREAD_KEYS.into_iter().enumerate() {
        if keyboard.just_pressed(key) && !ctx.dealing {
            if let Some(spread) = all_spreads().into_iter().nth(index) {
                info!("spread: {}", spread.title);
                ctx.spread = spread;
            }
        }
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        ctx.colorway = ctx.colorway.toggled();
        colorway_events.send(ColorwayChanged);
        info!("colorway: {}", ctx.colorway.label());
    }
}
