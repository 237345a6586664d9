use bevy::prelude::*;

mod cards;
mod components;
mod spreads;
mod systems;

use cards::DeckCatalog;
use components::*;
use systems::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Arcana".into(),
                resolution: (1200.0, 800.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Core table resources
        .insert_resource(TableContext::default())
        .insert_resource(DeckCatalog::default())
        .insert_resource(ReadingNotes::default())
        .insert_resource(DealPhase::default())
        .insert_resource(PendingDeal::default())
        .insert_resource(Backdrop::default())
        .add_event::<DealRequest>()
        .add_event::<DealFailed>()
        .add_event::<ColorwayChanged>()
        .add_systems(
            Startup,
            (
                setup_camera,
                initialize_profile_system,
                initialize_settings_system,
                setup_backdrop,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                // Input and the deal pipeline, in pipeline order
                keyboard_controls_system,
                mouse_input_system,
                begin_deal_system,
                poll_deal_assets_system,
                sequence_deal_system,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                // Per-frame animation drivers
                deal_tween_system,
                flip_tween_system,
                zoom_tween_system,
                fade_system,
                frame_sync_system,
            ),
        )
        .add_systems(
            Update,
            (
                window_resize_system,
                reposition_labels_system,
                backdrop_system,
                backdrop_resize_system,
                retexture_cards_system,
                save_reading_system,
                persist_settings_system,
            ),
        )
        .add_systems(PostUpdate, despawn_marked_entities)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

fn initialize_profile_system(mut ctx: ResMut<TableContext>, windows: Query<&Window>) {
    let window = windows.single();
    ctx.device = DeviceClass::pick(window.width());
    info!("active profile: {:?}", ctx.device);
}

pub fn despawn_marked_entities(
    mut commands: Commands,
    query: Query<Entity, With<MarkedForDespawn>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
