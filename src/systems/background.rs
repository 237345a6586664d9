use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::WindowResized;

use crate::cards::canvas_art_path;
use crate::components::{ColorwayChanged, TableContext};

const GRADIENT_FROM: Srgba = Srgba::new(0.0, 0.0, 0.0, 1.0);
// #535b73, the slate tone behind dealt spreads.
const GRADIENT_TO: Srgba = Srgba::new(0.3255, 0.3569, 0.4510, 1.0);
const GRADIENT_FADE_STEP: f32 = 0.06;
const BACKDROP_Z: f32 = -10.0;

/// Decorative fill behind the table: a colorway photo until the first deal,
/// a generated gradient afterwards.
#[derive(Resource, Default)]
pub struct Backdrop {
    gradient_requested: bool,
    pub using_gradient: bool,
}

impl Backdrop {
    pub fn request_gradient(&mut self) {
        self.gradient_requested = true;
    }
}

#[derive(Component)]
pub struct PhotoBackdrop;

#[derive(Component)]
pub struct GradientBackdrop;

pub fn setup_backdrop(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    ctx: Res<TableContext>,
    windows: Query<&Window>,
) {
    let window = windows.single();
    let size = Vec2::new(window.width(), window.height());
    commands.spawn((
        SpriteBundle {
            texture: asset_server.load(canvas_art_path(ctx.colorway, size.x, size.y)),
            sprite: Sprite {
                custom_size: Some(size),
                ..default()
            },
            transform: Transform::from_xyz(0.0, 0.0, BACKDROP_Z),
            ..default()
        },
        PhotoBackdrop,
    ));
}

fn gradient_image(from: Srgba, to: Srgba) -> Image {
    const SIZE: u32 = 128;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let t = (x + y) as f32 / (SIZE * 2 - 2) as f32;
            data.push(((from.red + (to.red - from.red) * t) * 255.0) as u8);
            data.push(((from.green + (to.green - from.green) * t) * 255.0) as u8);
            data.push(((from.blue + (to.blue - from.blue) * t) * 255.0) as u8);
            data.push(255);
        }
    }
    Image::new(
        Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// Swaps the photo for the gradient when a deal asks for it, then drives the
/// gradient's incremental fade-in.
pub fn backdrop_system(
    mut commands: Commands,
    mut backdrop: ResMut<Backdrop>,
    mut images: ResMut<Assets<Image>>,
    windows: Query<&Window>,
    photos: Query<Entity, With<PhotoBackdrop>>,
    mut gradients: Query<&mut Sprite, With<GradientBackdrop>>,
) {
    if backdrop.gradient_requested {
        backdrop.gradient_requested = false;
        if !backdrop.using_gradient {
            backdrop.using_gradient = true;
            for entity in photos.iter() {
                commands.entity(entity).despawn();
            }
            let window = windows.single();
            commands.spawn((
                SpriteBundle {
                    texture: images.add(gradient_image(GRADIENT_FROM, GRADIENT_TO)),
                    sprite: Sprite {
                        custom_size: Some(Vec2::new(window.width(), window.height())),
                        color: Color::srgba(1.0, 1.0, 1.0, 0.0),
                        ..default()
                    },
                    transform: Transform::from_xyz(0.0, 0.0, BACKDROP_Z),
                    ..default()
                },
                GradientBackdrop,
            ));
        }
    }

    for mut sprite in gradients.iter_mut() {
        let mut color = sprite.color.to_srgba();
        if color.alpha < 1.0 {
            color.alpha = (color.alpha + GRADIENT_FADE_STEP).min(1.0);
            sprite.color = Color::from(color);
        }
    }
}

/// Keeps the backdrop covering the canvas across resizes and colorway
/// switches.
pub fn backdrop_resize_system(
    mut resizes: EventReader<WindowResized>,
    mut recolors: EventReader<ColorwayChanged>,
    ctx: Res<TableContext>,
    asset_server: Res<AssetServer>,
    windows: Query<&Window>,
    mut photos: Query<(&mut Sprite, &mut Handle<Image>), With<PhotoBackdrop>>,
    mut gradients: Query<&mut Sprite, (With<GradientBackdrop>, Without<PhotoBackdrop>)>,
) {
    let resized = resizes.read().last().is_some();
    let recolored = !recolors.is_empty();
    recolors.clear();
    if !resized && !recolored {
        return;
    }

    let window = windows.single();
    let size = Vec2::new(window.width(), window.height());
    for (mut sprite, mut texture) in photos.iter_mut() {
        sprite.custom_size = Some(size);
        *texture = asset_server.load(canvas_art_path(ctx.colorway, size.x, size.y));
    }
    for mut sprite in gradients.iter_mut() {
        sprite.custom_size = Some(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_runs_corner_to_corner() {
        let image = gradient_image(GRADIENT_FROM, GRADIENT_TO);
        let data = &image.data;
        // First pixel is the `from` color, last is the `to` color.
        assert_eq!(data[0], 0);
        assert_eq!(data[1], 0);
        assert_eq!(data[2], 0);
        assert_eq!(data[3], 255);
        let last = data.len() - 4;
        assert_eq!(data[last], (GRADIENT_TO.red * 255.0) as u8);
        assert_eq!(data[last + 1], (GRADIENT_TO.green * 255.0) as u8);
        assert_eq!(data[last + 2], (GRADIENT_TO.blue * 255.0) as u8);
    }
}
