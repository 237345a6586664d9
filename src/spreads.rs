use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate};

use crate::systems::profiles::DeviceClass;

/// A named position in a spread, in percent-of-canvas coordinates. Slots may
/// be tagged with a device class; the resolver prefers a tagged slot over a
/// generic one with the same `id_key`.
#[derive(Clone, Debug)]
pub struct SpreadSlot {
    pub id_key: &'static str,
    pub label: String,
    pub x_pct: f32,
    pub y_pct: f32,
    pub angle: f32,
    pub device: Option<DeviceClass>,
}

#[derive(Clone, Debug)]
pub struct SpreadDef {
    pub id: &'static str,
    pub title: String,
    pub slots: Vec<SpreadSlot>,
}

fn slot(
    device: DeviceClass,
    id_key: &'static str,
    label: &str,
    x_pct: f32,
    y_pct: f32,
) -> SpreadSlot {
    SpreadSlot {
        id_key,
        label: label.to_string(),
        x_pct,
        y_pct,
        angle: 0.0,
        device: Some(device),
    }
}

/// Same slot geometry on every device class.
fn slot_all(id_key: &'static str, label: &str, x_pct: f32, y_pct: f32) -> Vec<SpreadSlot> {
    [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop]
        .into_iter()
        .map(|d| slot(d, id_key, label, x_pct, y_pct))
        .collect()
}

pub fn ppf() -> SpreadDef {
    let mut slots = Vec::new();
    for d in [DeviceClass::Desktop, DeviceClass::Tablet] {
        slots.push(slot(d, "past-3", "Past", 30.0, 50.0));
        slots.push(slot(d, "present-3", "Present", 50.0, 50.0));
        slots.push(slot(d, "future-3", "Future", 70.0, 50.0));
    }
    // Narrow screens stack the line vertically.
    slots.push(slot(DeviceClass::Mobile, "past-3", "Past", 30.0, 20.0));
    slots.push(slot(DeviceClass::Mobile, "present-3", "Present", 30.0, 50.0));
    slots.push(slot(DeviceClass::Mobile, "future-3", "Future", 30.0, 80.0));
    SpreadDef {
        id: "ppf",
        title: "Past \u{2022} Present \u{2022} Future".to_string(),
        slots,
    }
}

pub fn fml() -> SpreadDef {
    let mut slots = Vec::new();
    slots.extend(slot_all("focus-3", "Focus", 50.0, 35.0));
    slots.extend(slot_all("forward-3", "Moving Forward", 30.0, 65.0));
    slots.extend(slot_all("letgo-3", "Letting Go", 70.0, 65.0));
    SpreadDef {
        id: "fml",
        title: "Focus \u{2022} Moving Forward \u{2022} Letting Go".to_string(),
        slots,
    }
}

pub fn kdk() -> SpreadDef {
    let mut slots = Vec::new();
    slots.extend(slot_all("know-3", "What I Know", 50.0, 35.0));
    slots.extend(slot_all("dontknow-3", "What I Don't Know", 30.0, 65.0));
    slots.extend(slot_all("need-3", "What I Need To Know", 70.0, 65.0));
    SpreadDef {
        id: "kdk",
        title: "Know \u{2022} Don't Know \u{2022} Need To Know".to_string(),
        slots,
    }
}

fn five_card_row(
    id: &'static str,
    title: &str,
    keys: [&'static str; 5],
    labels: [&str; 5],
) -> SpreadDef {
    let mut slots = Vec::new();
    let xs = [16.0, 33.0, 50.0, 67.0, 84.0];
    for d in [DeviceClass::Desktop, DeviceClass::Tablet] {
        for i in 0..5 {
            slots.push(slot(d, keys[i], labels[i], xs[i], 50.0));
        }
    }
    let ys = [10.0, 30.0, 50.0, 70.0, 90.0];
    for i in 0..5 {
        slots.push(slot(DeviceClass::Mobile, keys[i], labels[i], 30.0, ys[i]));
    }
    SpreadDef {
        id,
        title: title.to_string(),
        slots,
    }
}

pub fn pphao() -> SpreadDef {
    five_card_row(
        "pphao",
        "Past \u{2022} Present \u{2022} Hidden \u{2022} Advice \u{2022} Outcome",
        ["past-5", "present-5", "hidden-5", "advice-5", "outcome-5"],
        ["Past", "Present", "Hidden Issues", "Advice", "Outcome"],
    )
}

pub fn gsbbl() -> SpreadDef {
    five_card_row(
        "gsbbl",
        "Goal \u{2022} Status \u{2022} Block \u{2022} Bridge \u{2022} Lesson",
        ["goal-5", "current-5", "block-5", "bridge-5", "lesson-5"],
        ["Goal", "Status", "Block", "Bridge", "Lesson"],
    )
}

pub fn this_or_that(path_a: &str, path_b: &str) -> SpreadDef {
    let pros_a = format!("Pros:\n{path_a}");
    let cons_a = format!("Cons:\n{path_a}");
    let pros_b = format!("Pros:\n{path_b}");
    let cons_b = format!("Cons:\n{path_b}");
    let mut slots = Vec::new();
    for d in [DeviceClass::Desktop, DeviceClass::Tablet] {
        slots.push(slot(d, "focus-5", "Focus", 50.0, 30.0));
        slots.push(slot(d, "prosA-5", &pros_a, 20.0, 65.0));
        slots.push(slot(d, "consA-5", &cons_a, 35.0, 65.0));
        slots.push(slot(d, "prosB-5", &pros_b, 65.0, 65.0));
        slots.push(slot(d, "consB-5", &cons_b, 80.0, 65.0));
    }
    slots.push(slot(DeviceClass::Mobile, "focus-5", "Focus", 50.0, 20.0));
    slots.push(slot(DeviceClass::Mobile, "prosA-5", &pros_a, 30.0, 50.0));
    slots.push(slot(DeviceClass::Mobile, "consA-5", &cons_a, 70.0, 50.0));
    slots.push(slot(DeviceClass::Mobile, "prosB-5", &pros_b, 30.0, 80.0));
    slots.push(slot(DeviceClass::Mobile, "consB-5", &cons_b, 70.0, 80.0));
    SpreadDef {
        id: "this-or-that",
        title: format!("{path_a} vs {path_b} (Pros & Cons)"),
        slots,
    }
}

pub const ZODIAC: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

const ZODIAC_KEYS: [&str; 12] = [
    "aries",
    "taurus",
    "gemini",
    "cancer",
    "leo",
    "virgo",
    "libra",
    "scorpio",
    "sagittarius",
    "capricorn",
    "aquarius",
    "pisces",
];

// Tropical date ranges, (month, day) inclusive on both ends.
const SEASON_RANGES: [((u32, u32), (u32, u32)); 12] = [
    ((3, 21), (4, 19)),
    ((4, 20), (5, 20)),
    ((5, 21), (6, 20)),
    ((6, 21), (7, 22)),
    ((7, 23), (8, 22)),
    ((8, 23), (9, 22)),
    ((9, 23), (10, 22)),
    ((10, 23), (11, 21)),
    ((11, 22), (12, 21)),
    ((12, 22), (1, 19)), // Capricorn crosses the year boundary
    ((1, 20), (2, 18)),
    ((2, 19), (3, 20)),
];

fn on_or_after(m: u32, d: u32, sm: u32, sd: u32) -> bool {
    if m == sm {
        d >= sd
    } else {
        m > sm
    }
}

fn on_or_before(m: u32, d: u32, em: u32, ed: u32) -> bool {
    if m == em {
        d <= ed
    } else {
        m < em
    }
}

pub fn current_season_index(date: NaiveDate) -> usize {
    let (m, d) = (date.month(), date.day());
    for (i, ((sm, sd), (em, ed))) in SEASON_RANGES.iter().enumerate() {
        let wraps = em < sm;
        let in_range = if wraps {
            on_or_after(m, d, *sm, *sd) || on_or_before(m, d, *em, *ed)
        } else {
            on_or_after(m, d, *sm, *sd) && on_or_before(m, d, *em, *ed)
        };
        if in_range {
            return i;
        }
    }
    0
}

/// Twelve zodiac positions, rotated so the wheel starts at the given season.
/// Desktop and tablet lay two rows of six; mobile uses a 3x4 grid.
pub fn horoscope(start_from_season: usize) -> SpreadDef {
    let start = start_from_season % 12;
    let rotated: Vec<usize> = (0..12).map(|i| (start + i) % 12).collect();

    let mut slots = Vec::new();
    for d in [DeviceClass::Desktop, DeviceClass::Tablet] {
        for (i, &z) in rotated.iter().enumerate() {
            let col = i % 6;
            let y = if i < 6 { 25.0 } else { 65.0 };
            let x = ((col + 1) as f32) * 100.0 / 7.0;
            slots.push(slot(d, ZODIAC_KEYS[z], ZODIAC[z], x, y));
        }
    }
    for (i, &z) in rotated.iter().enumerate() {
        let col = i % 3;
        let row = i / 3;
        let x = 25.0 + col as f32 * 25.0;
        let y = 10.0 + row as f32 * 25.0;
        slots.push(slot(DeviceClass::Mobile, ZODIAC_KEYS[z], ZODIAC[z], x, y));
    }
    SpreadDef {
        id: "horoscope",
        title: "Horoscope (starts at current season)".to_string(),
        slots,
    }
}

pub fn all_spreads() -> Vec<SpreadDef> {
    vec![
        ppf(),
        fml(),
        kdk(),
        pphao(),
        gsbbl(),
        this_or_that("Option A", "Option B"),
        horoscope(current_season_index(Local::now().date_naive())),
    ]
}

/// Slots for one device class: device-tagged slots win over generic ones per
/// `id_key`; with no tagged slots at all, the generic set is used as-is.
pub fn slots_for_device(spread: &SpreadDef, device: DeviceClass) -> Vec<SpreadSlot> {
    let has_tagged = spread.slots.iter().any(|s| s.device == Some(device));
    if !has_tagged {
        return spread
            .slots
            .iter()
            .filter(|s| s.device.is_none())
            .cloned()
            .collect();
    }

    let mut order: Vec<&'static str> = Vec::new();
    let mut chosen: HashMap<&'static str, SpreadSlot> = HashMap::new();
    for s in &spread.slots {
        let relevant = s.device.is_none() || s.device == Some(device);
        if !relevant {
            continue;
        }
        if !order.contains(&s.id_key) {
            order.push(s.id_key);
        }
        // Tagged slots override generic ones, never the other way around.
        let replace = match chosen.get(s.id_key) {
            Some(existing) => existing.device.is_none(),
            None => true,
        };
        if replace {
            chosen.insert(s.id_key, s.clone());
        }
    }
    order
        .into_iter()
        .filter_map(|k| chosen.remove(k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_prefers_device_tagged_slots() {
        let spread = ppf();
        let mobile = slots_for_device(&spread, DeviceClass::Mobile);
        assert_eq!(mobile.len(), 3);
        // Mobile stacks the line vertically at x = 30%.
        assert!(mobile.iter().all(|s| s.x_pct == 30.0));
        let desktop = slots_for_device(&spread, DeviceClass::Desktop);
        assert_eq!(desktop.len(), 3);
        assert!(desktop.iter().all(|s| s.y_pct == 50.0));
    }

    #[test]
    fn resolver_falls_back_to_generic_slots() {
        let spread = SpreadDef {
            id: "test",
            title: "Test".to_string(),
            slots: vec![
                SpreadSlot {
                    id_key: "a",
                    label: "A".to_string(),
                    x_pct: 10.0,
                    y_pct: 10.0,
                    angle: 0.0,
                    device: None,
                },
                SpreadSlot {
                    id_key: "a",
                    label: "A (mobile)".to_string(),
                    x_pct: 40.0,
                    y_pct: 40.0,
                    angle: 0.0,
                    device: Some(DeviceClass::Mobile),
                },
            ],
        };
        let mobile = slots_for_device(&spread, DeviceClass::Mobile);
        assert_eq!(mobile.len(), 1);
        assert_eq!(mobile[0].x_pct, 40.0);
        let tablet = slots_for_device(&spread, DeviceClass::Tablet);
        assert_eq!(tablet.len(), 1);
        assert_eq!(tablet[0].x_pct, 10.0);
    }

    #[test]
    fn season_index_matches_known_dates() {
        let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(current_season_index(d(2025, 3, 21)), 0); // Aries start
        assert_eq!(current_season_index(d(2025, 8, 6)), 4); // Leo
        assert_eq!(current_season_index(d(2025, 12, 25)), 9); // Capricorn
        assert_eq!(current_season_index(d(2026, 1, 10)), 9); // still Capricorn
        assert_eq!(current_season_index(d(2026, 1, 25)), 10); // Aquarius
    }

    #[test]
    fn horoscope_rotates_to_current_season() {
        let spread = horoscope(4); // Leo first
        let desktop = slots_for_device(&spread, DeviceClass::Desktop);
        assert_eq!(desktop.len(), 12);
        assert_eq!(desktop[0].id_key, "leo");
        assert_eq!(desktop[11].id_key, "cancer");
        let mobile = slots_for_device(&spread, DeviceClass::Mobile);
        assert_eq!(mobile.len(), 12);
        assert_eq!(mobile[0].id_key, "leo");
        // 3-column grid on mobile
        assert_eq!(mobile[0].x_pct, 25.0);
        assert_eq!(mobile[1].x_pct, 50.0);
        assert_eq!(mobile[2].x_pct, 75.0);
        assert_eq!(mobile[3].y_pct, 35.0);
    }

    #[test]
    fn this_or_that_renders_path_labels() {
        let spread = this_or_that("Moving", "Staying");
        let slots = slots_for_device(&spread, DeviceClass::Desktop);
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[1].label, "Pros:\nMoving");
        assert_eq!(slots[4].label, "Cons:\nStaying");
    }

    #[test]
    fn every_spread_resolves_on_every_device() {
        for spread in all_spreads() {
            for device in [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop] {
                let slots = slots_for_device(&spread, device);
                assert!(!slots.is_empty(), "spread {} on {:?}", spread.id, device);
                // ids unique within the resolved set
                for (i, a) in slots.iter().enumerate() {
                    for b in slots.iter().skip(i + 1) {
                        assert_ne!(a.id_key, b.id_key);
                    }
                }
            }
        }
    }
}
