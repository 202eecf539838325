//! Built-in background presets offered by the background picker.
//!
//! Gradient presets carry their stops as typed colors, so applying one never
//! involves parsing a CSS string. Image presets are only a catalogue of URLs;
//! fetching and decoding them is the shell's job.

use serde::Serialize;

use crate::color::{Color, GradientStops};

/// A named two-stop gradient, drawn at 135°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradientPreset {
    pub name: &'static str,
    pub stops: GradientStops,
}

/// A named stock background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImagePreset {
    pub name: &'static str,
    pub url: &'static str,
    pub thumbnail: &'static str,
}

const fn gradient(name: &'static str, start: u32, end: u32) -> GradientPreset {
    GradientPreset {
        name,
        stops: GradientStops::new(Color::from_hex_u32(start), Color::from_hex_u32(end)),
    }
}

pub const GRADIENT_PRESETS: [GradientPreset; 8] = [
    gradient("Sunset", 0xff6b6b, 0xfeca57),
    gradient("Ocean", 0x667eea, 0x764ba2),
    gradient("Forest", 0x11998e, 0x38ef7d),
    gradient("Purple Dream", 0xa8edea, 0xfed6e3),
    gradient("Fire", 0xff9a9e, 0xfecfef),
    gradient("Sky", 0x74b9ff, 0x0984e3),
    gradient("Mint", 0x00b894, 0x00cec9),
    gradient("Rose Gold", 0xf093fb, 0xf5576c),
];

macro_rules! unsplash {
    ($name:literal, $id:literal) => {
        ImagePreset {
            name: $name,
            url: concat!(
                "https://images.unsplash.com/photo-",
                $id,
                "?w=1920&h=1080&fit=crop&crop=center"
            ),
            thumbnail: concat!(
                "https://images.unsplash.com/photo-",
                $id,
                "?w=200&h=120&fit=crop&crop=center"
            ),
        }
    };
}

pub const IMAGE_PRESETS: [ImagePreset; 6] = [
    unsplash!("Starry Night", "1470813740244-df37b8c1edcb"),
    unsplash!("Mountain Dawn", "1470071459604-3b5ec3a7fe05"),
    unsplash!("Ocean Wave", "1500375592092-40eb2168fd21"),
    unsplash!("Desert Dunes", "1482881497185-d4a9ddbe4151"),
    unsplash!("Forest Light", "1523712999610-f77fbcfc3843"),
    unsplash!("Lake Reflection", "1506744038136-46273834b3fb"),
];

/// Look up a gradient preset by name, ignoring case.
pub fn gradient_preset(name: &str) -> Option<&'static GradientPreset> {
    GRADIENT_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

/// Look up an image preset by name, ignoring case.
pub fn image_preset(name: &str) -> Option<&'static ImagePreset> {
    IMAGE_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}
