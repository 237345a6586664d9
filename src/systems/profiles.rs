use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::components::{CardBody, DealTarget, TableContext, TarotCard, CARD_W};
use crate::spreads::SpreadSlot;
use crate::systems::tween::ZoomTween;

/// Responsive layout profile, picked by viewport width. The dispatch table is
/// ordered and the last entry matches everything, so every width resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub const DISPATCH: [DeviceClass; 3] =
        [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop];

    pub fn matches(self, width: f32) -> bool {
        match self {
            DeviceClass::Mobile => width <= 520.0,
            DeviceClass::Tablet => width > 520.0 && width <= 1180.0,
            DeviceClass::Desktop => true,
        }
    }

    pub fn pick(width: f32) -> Self {
        Self::DISPATCH
            .into_iter()
            .find(|p| p.matches(width))
            .unwrap_or(DeviceClass::Desktop)
    }

    /// Non-zoomed card width as a fraction of viewport width.
    pub fn base_width_rel(self) -> f32 {
        match self {
            DeviceClass::Mobile => 0.20,
            DeviceClass::Tablet => 0.13,
            DeviceClass::Desktop => 0.18,
        }
    }

    /// Padding around a zoomed card when fitting it to the viewport.
    pub fn zoom_padding(self) -> f32 {
        match self {
            DeviceClass::Mobile => 12.0,
            DeviceClass::Tablet => 24.0,
            DeviceClass::Desktop => 32.0,
        }
    }

    pub fn zoom_overscale(self) -> f32 {
        match self {
            DeviceClass::Mobile => 1.2,
            DeviceClass::Tablet => 1.0,
            DeviceClass::Desktop => 1.0,
        }
    }
}

/// Absolute scale at which the card's rendered width equals
/// `viewport_width * base_width_rel`. Computed from current rendered bounds,
/// so repeated application does not drift.
pub fn compute_base_scale(
    current_scale: f32,
    rendered_width: f32,
    viewport_width: f32,
    device: DeviceClass,
) -> f32 {
    let target_width = viewport_width * device.base_width_rel();
    current_scale * (target_width / rendered_width.max(1.0))
}

/// Absolute scale that fits the current rendered bounds into the padded
/// viewport, times the profile overscale. Floored at 1.5x the pre-zoom scale
/// so zooming never reads as a shrink.
pub fn compute_zoom_scale(
    current_scale: f32,
    rendered: Vec2,
    viewport: Vec2,
    device: DeviceClass,
) -> f32 {
    let pad = device.zoom_padding();
    let avail_w = viewport.x - pad * 2.0;
    let avail_h = viewport.y - pad * 2.0;
    let k = (avail_w / rendered.x.max(1.0)).min(avail_h / rendered.y.max(1.0));
    let fitted = current_scale * k * device.zoom_overscale();
    fitted.max(current_scale * 1.5)
}

/// Percent slots to world-space targets, center-origin, y up.
pub fn targets_from_slots(slots: &[SpreadSlot], viewport: Vec2) -> Vec<DealTarget> {
    slots
        .iter()
        .map(|s| DealTarget {
            x: (s.x_pct / 100.0 - 0.5) * viewport.x,
            y: (0.5 - s.y_pct / 100.0) * viewport.y,
            angle: s.angle,
        })
        .collect()
}

/// Hand-authored escapes for (profile, spread) pairs where percent placement
/// degrades. Generic targets pass through untouched.
pub fn apply_layout_overrides(
    device: DeviceClass,
    spread_id: &str,
    targets: &mut Vec<DealTarget>,
    viewport: Vec2,
) {
    match (device, targets.len()) {
        // Tablet aspect ratios crowd the two rows of a 5-card spread.
        (DeviceClass::Tablet, 5) => {
            let gap = viewport.y * 0.05;
            let pad = (viewport.y * 0.04).max(8.0);
            let limit = viewport.y / 2.0 - pad;
            for (i, t) in targets.iter_mut().enumerate() {
                if i <= 2 {
                    t.y += gap;
                } else {
                    t.y -= gap;
                }
                t.y = t.y.clamp(-limit, limit);
            }
        }
        // Narrow horoscope swaps the percent slots for an evenly padded grid.
        (DeviceClass::Mobile, 12) if spread_id == "horoscope" => {
            let (cols, rows) = (3usize, 4usize);
            let pad_pct = 8.0;
            let cell_w = (100.0 - pad_pct * 2.0) / cols as f32;
            let cell_h = (100.0 - pad_pct * 2.0) / rows as f32;
            for (i, t) in targets.iter_mut().enumerate() {
                let (c, r) = (i % cols, i / cols);
                let x_pct = pad_pct + cell_w * (c as f32 + 0.5);
                let y_pct = pad_pct + cell_h * (r as f32 + 0.5);
                t.x = (x_pct / 100.0 - 0.5) * viewport.x;
                t.y = (0.5 - y_pct / 100.0) * viewport.y;
            }
        }
        _ => {}
    }
}

/// On resize: re-pick the profile and re-apply the base scale to every card
/// except a zoomed one. Proxies rescale by the same ratio so hit-testing
/// stays consistent.
pub fn window_resize_system(
    mut events: EventReader<WindowResized>,
    mut ctx: ResMut<TableContext>,
    mut cards: Query<
        (Entity, &mut Transform, &mut CardBody, Option<&ZoomTween>),
        With<TarotCard>,
    >,
) {
    let Some(width) = events.read().last().map(|resized| resized.width) else {
        return;
    };
    ctx.device = DeviceClass::pick(width);

    // Reference scale comes from a card that no zoom tween currently owns;
    // scale.y is stable even mid-flip.
    let Some(current) = cards
        .iter()
        .find(|(entity, _, _, zoom)| zoom.is_none() && ctx.zoomed != Some(*entity))
        .map(|(_, transform, _, _)| transform.scale.y)
    else {
        return;
    };
    let new_scale = compute_base_scale(current, CARD_W * current, width, ctx.device);

    for (entity, mut transform, mut body, _) in cards.iter_mut() {
        if ctx.zoomed == Some(entity) {
            continue;
        }
        let cur = transform.scale.y.max(f32::EPSILON);
        if (cur - new_scale).abs() < 1e-3 {
            continue;
        }
        transform.scale = Vec3::new(new_scale, new_scale, 1.0);
        body.rescale(new_scale / cur);
    }
    ctx.base_scale = new_scale;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_partition_all_widths() {
        for w in [0.0, 1.0, 319.0, 520.0, 520.5, 1024.0, 1180.0, 1181.0, 3840.0] {
            let matched: Vec<_> = DeviceClass::DISPATCH
                .into_iter()
                .filter(|p| p.matches(w))
                .collect();
            assert!(!matched.is_empty(), "width {w} matched no profile");
            assert_eq!(DeviceClass::pick(w), matched[0]);
        }
        assert_eq!(DeviceClass::pick(320.0), DeviceClass::Mobile);
        assert_eq!(DeviceClass::pick(521.0), DeviceClass::Tablet);
        assert_eq!(DeviceClass::pick(1920.0), DeviceClass::Desktop);
    }

    #[test]
    fn base_scale_is_stable_under_repetition() {
        let device = DeviceClass::Desktop;
        let viewport_w = 1200.0;
        let s1 = compute_base_scale(1.0, CARD_W, viewport_w, device);
        // Applying again from the already-scaled bounds changes nothing.
        let s2 = compute_base_scale(s1, CARD_W * s1, viewport_w, device);
        assert!((s1 - s2).abs() < 1e-5);
        assert!((CARD_W * s1 - viewport_w * device.base_width_rel()).abs() < 1e-3);
    }

    #[test]
    fn zoom_scale_never_shrinks() {
        // Even on a viewport where the fit would be below the current scale,
        // the result is at least 1.5x the pre-zoom scale.
        for device in DeviceClass::DISPATCH {
            for (vw, vh) in [(360.0, 640.0), (800.0, 600.0), (2560.0, 1440.0)] {
                let current = 0.9;
                let rendered = Vec2::new(CARD_W, 300.0) * current;
                let zoomed = compute_zoom_scale(current, rendered, Vec2::new(vw, vh), device);
                assert!(
                    zoomed >= current * 1.5 - 1e-6,
                    "{device:?} {vw}x{vh}: {zoomed} < 1.5x"
                );
            }
        }
    }

    #[test]
    fn tablet_override_spreads_five_card_rows() {
        let viewport = Vec2::new(900.0, 700.0);
        let mut targets = vec![
            DealTarget { x: 0.0, y: 100.0, angle: 0.0 },
            DealTarget { x: -100.0, y: 100.0, angle: 0.0 },
            DealTarget { x: 100.0, y: 100.0, angle: 0.0 },
            DealTarget { x: -50.0, y: -100.0, angle: 0.0 },
            DealTarget { x: 50.0, y: -100.0, angle: 0.0 },
        ];
        let before: Vec<f32> = targets.iter().map(|t| t.y).collect();
        apply_layout_overrides(DeviceClass::Tablet, "pphao", &mut targets, viewport);
        let gap = viewport.y * 0.05;
        for i in 0..3 {
            assert!((targets[i].y - (before[i] + gap)).abs() < 1e-4);
        }
        for i in 3..5 {
            assert!((targets[i].y - (before[i] - gap)).abs() < 1e-4);
        }
        // Desktop is untouched.
        let mut untouched = vec![DealTarget { x: 0.0, y: 100.0, angle: 0.0 }; 5];
        apply_layout_overrides(DeviceClass::Desktop, "pphao", &mut untouched, viewport);
        assert!(untouched.iter().all(|t| t.y == 100.0));
    }

    #[test]
    fn tablet_override_clamps_to_canvas() {
        let viewport = Vec2::new(900.0, 400.0);
        let limit = viewport.y / 2.0 - (viewport.y * 0.04).max(8.0);
        let mut targets = vec![
            DealTarget { x: 0.0, y: 195.0, angle: 0.0 };
            5
        ];
        apply_layout_overrides(DeviceClass::Tablet, "pphao", &mut targets, viewport);
        for t in &targets {
            assert!(t.y.abs() <= limit + 1e-4);
        }
    }

    #[test]
    fn mobile_horoscope_override_builds_grid() {
        let viewport = Vec2::new(400.0, 800.0);
        let mut targets = vec![DealTarget { x: 0.0, y: 0.0, angle: 0.0 }; 12];
        apply_layout_overrides(DeviceClass::Mobile, "horoscope", &mut targets, viewport);
        // Three distinct columns, four distinct rows.
        assert!((targets[0].x - targets[3].x).abs() < 1e-4);
        assert!((targets[0].y - targets[1].y).abs() < 1e-4);
        assert!(targets[0].x < targets[1].x && targets[1].x < targets[2].x);
        assert!(targets[0].y > targets[3].y && targets[3].y > targets[6].y);
    }

    #[test]
    fn percent_slots_map_to_world_space() {
        use crate::spreads::{ppf, slots_for_device};
        let slots = slots_for_device(&ppf(), DeviceClass::Desktop);
        let targets = targets_from_slots(&slots, Vec2::new(1000.0, 800.0));
        // past-3 at 30%/50% -> x = -200, y = 0
        assert!((targets[0].x - -200.0).abs() < 1e-4);
        assert!(targets[0].y.abs() < 1e-4);
        // future-3 at 70%/50% -> x = 200
        assert!((targets[2].x - 200.0).abs() < 1e-4);
    }
}
