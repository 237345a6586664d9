use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub struct CardMeta {
    pub id: &'static str,
    pub name: &'static str,
}

const fn card(id: &'static str, name: &'static str) -> CardMeta {
    CardMeta { id, name }
}

// The full deck: 22 majors plus four suits of ten.
pub const CARDS_CATALOG: [CardMeta; 62] = [
    card("0.TheOne", "The One"),
    card("1.TheEnchanter", "The Enchanter"),
    card("2.TheEnchantress", "The Enchantress"),
    card("3.TheGreatMother", "The Great Mother"),
    card("4.TheGreatFather", "The Great Father"),
    card("5.TheSage", "The Sage"),
    card("6.TheBeloved", "The Beloved"),
    card("7.TheMarionette", "The Marionette"),
    card("8.LadyLeo", "Lady Leo"),
    card("9.ThePearl", "The Pearl"),
    card("10.TheFates", "The Fates"),
    card("11.TheScales", "The Scales"),
    card("12.TheMime", "The Mime"),
    card("13.Birth", "Birth"),
    card("14.Spellcasting", "Spellcasting"),
    card("15.Vices", "Vices"),
    card("16.TheFortress", "The Fortress"),
    card("17.Healing", "Healing"),
    card("18.Illusion", "Illusion"),
    card("19.Soul", "Soul"),
    card("20.Awakening", "Awakening"),
    card("21.TheUniverse", "The Universe"),
    card("22.OneOfSparks", "One of Sparks"),
    card("23.TwoOfSparks", "Two of Sparks"),
    card("24.ThreeOfSparks", "Three of Sparks"),
    card("25.FourOfSparks", "Four of Sparks"),
    card("26.FiveOfSparks", "Five of Sparks"),
    card("27.SixOfSparks", "Six of Sparks"),
    card("28.SevenOfSparks", "Seven of Sparks"),
    card("29.EightOfSparks", "Eight of Sparks"),
    card("30.NineOfSparks", "Nine of Sparks"),
    card("31.TenOfSparks", "Ten of Sparks"),
    card("32.OneOfTears", "One of Tears"),
    card("33.TwoOfTears", "Two of Tears"),
    card("34.ThreeOfTears", "Three of Tears"),
    card("35.FourOfTears", "Four of Tears"),
    card("36.FiveOfTears", "Five of Tears"),
    card("37.SixOfTears", "Six of Tears"),
    card("38.SevenOfTears", "Seven of Tears"),
    card("39.EightOfTears", "Eight of Tears"),
    card("40.NineOfTears", "Nine of Tears"),
    card("41.TenOfTears", "Ten of Tears"),
    card("42.OneOfSoil", "One of Soil"),
    card("43.TwoOfSoil", "Two of Soil"),
    card("44.ThreeOfSoil", "Three of Soil"),
    card("45.FourOfSoil", "Four of Soil"),
    card("46.FiveOfSoil", "Five of Soil"),
    card("47.SixOfSoil", "Six of Soil"),
    card("48.SevenOfSoil", "Seven of Soil"),
    card("49.EightOfSoil", "Eight of Soil"),
    card("50.NineOfSoil", "Nine of Soil"),
    card("51.TenOfSoil", "Ten of Soil"),
    card("52.OneOfWhispers", "One of Whispers"),
    card("53.TwoOfWhispers", "Two of Whispers"),
    card("54.ThreeOfWhispers", "Three of Whispers"),
    card("55.FourOfWhispers", "Four of Whispers"),
    card("56.FiveOfWhispers", "Five of Whispers"),
    card("57.SixOfWhispers", "Six of Whispers"),
    card("58.SevenOfWhispers", "Seven of Whispers"),
    card("59.EightOfWhispers", "Eight of Whispers"),
    card("60.NineOfWhispers", "Nine of Whispers"),
    card("61.TenOfWhispers", "Ten of Whispers"),
];

/// Card ids available for dealing. Must be non-empty before a deal starts.
#[derive(Resource)]
pub struct DeckCatalog {
    pub ids: Vec<&'static str>,
}

impl Default for DeckCatalog {
    fn default() -> Self {
        Self {
            ids: CARDS_CATALOG.iter().map(|c| c.id).collect(),
        }
    }
}

impl DeckCatalog {
    pub fn display_name(&self, id: &str) -> Option<&'static str> {
        CARDS_CATALOG.iter().find(|c| c.id == id).map(|c| c.name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colorway {
    #[default]
    Pink,
    Grey,
}

impl Colorway {
    pub fn toggled(self) -> Self {
        match self {
            Colorway::Pink => Colorway::Grey,
            Colorway::Grey => Colorway::Pink,
        }
    }

    fn dir(self) -> &'static str {
        match self {
            Colorway::Pink => "pink",
            Colorway::Grey => "grey",
        }
    }

    fn tone(self) -> &'static str {
        match self {
            Colorway::Pink => "Pink",
            Colorway::Grey => "Grey",
        }
    }

    pub fn label(self) -> &'static str {
        self.dir()
    }
}

pub fn front_art_path(card_id: &str, colorway: Colorway) -> String {
    format!("cards/fronts/{}/{}.png", colorway.dir(), card_id)
}

pub fn back_art_path(colorway: Colorway) -> String {
    format!("cards/backs/{}-Back.png", colorway.tone())
}

// Landscape canvases get the desktop artwork, portrait ones the mobile crop.
pub fn canvas_art_path(colorway: Colorway, width: f32, height: f32) -> String {
    let variant = if width >= height { "Desktop" } else { "Mobile" };
    format!("cards/canvas/{}-{}.png", colorway.tone(), variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = DeckCatalog::default();
        for (i, a) in catalog.ids.iter().enumerate() {
            for b in catalog.ids.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert_eq!(catalog.ids.len(), 62);
    }

    #[test]
    fn art_paths_follow_colorway() {
        assert_eq!(
            front_art_path("13.Birth", Colorway::Pink),
            "cards/fronts/pink/13.Birth.png"
        );
        assert_eq!(back_art_path(Colorway::Grey), "cards/backs/Grey-Back.png");
        assert_eq!(
            canvas_art_path(Colorway::Pink, 1200.0, 800.0),
            "cards/canvas/Pink-Desktop.png"
        );
        assert_eq!(
            canvas_art_path(Colorway::Grey, 400.0, 800.0),
            "cards/canvas/Grey-Mobile.png"
        );
    }
}
