//! True-colour values, xterm-256 lookups and gradient palettes.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

#[rustfmt::skip]
const SYSTEM_COLORS: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       Rgb::new(128, 0, 0),     Rgb::new(0, 128, 0),   Rgb::new(128, 128, 0),
    Rgb::new(0, 0, 128),     Rgb::new(128, 0, 128),   Rgb::new(0, 128, 128), Rgb::new(192, 192, 192),
    Rgb::new(128, 128, 128), Rgb::new(255, 0, 0),     Rgb::new(0, 255, 0),   Rgb::new(255, 255, 0),
    Rgb::new(0, 0, 255),     Rgb::new(255, 0, 255),   Rgb::new(0, 255, 255), Rgb::new(255, 255, 255),
];

/// RGB value of an xterm 256-colour index.
pub fn xterm_to_rgb(code: u8) -> Rgb {
    match code {
        0..=15 => SYSTEM_COLORS[code as usize],
        16..=231 => {
            let i = code - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + 40 * v };
            Rgb::new(level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        232..=255 => {
            let grey = 8 + 10 * (code - 232);
            Rgb::new(grey, grey, grey)
        }
    }
}

// Darker to brighter, as xterm-256 indices.
const GRADIENTS: &[(&str, [u8; 9])] = &[
    ("white", [232, 235, 238, 241, 244, 247, 250, 253, 255]),
    ("grey", [232, 235, 238, 241, 244, 247, 250, 253, 255]),
    ("gray", [232, 235, 238, 241, 244, 247, 250, 253, 255]),
    ("red", [52, 88, 124, 160, 196, 197, 198, 200, 201]),
    ("green", [22, 28, 34, 40, 46, 47, 48, 83, 119]),
    ("blue", [17, 18, 19, 20, 21, 27, 33, 39, 45]),
    ("yellow", [58, 100, 142, 184, 226, 227, 228, 229, 230]),
    ("magenta", [53, 91, 127, 163, 199, 200, 201, 206, 207]),
    ("cyan", [24, 31, 38, 45, 51, 50, 86, 122, 159]),
];

const COLOR_NAMES: &[(&str, u8)] = &[
    ("black", 0),
    ("maroon", 1),
    ("green", 2),
    ("olive", 3),
    ("navy", 4),
    ("purple", 5),
    ("teal", 6),
    ("silver", 7),
    ("grey", 8),
    ("gray", 8),
    ("red", 9),
    ("lime", 10),
    ("yellow", 11),
    ("blue", 12),
    ("fuchsia", 13),
    ("aqua", 14),
    ("white", 15),
    ("darkgrey", 232),
    ("darkgray", 232),
    ("lightgrey", 250),
    ("lightgray", 250),
    ("brightred", 196),
    ("brightgreen", 46),
    ("brightblue", 21),
    ("brightyellow", 226),
    ("brightmagenta", 199),
    ("brightcyan", 51),
    ("brightwhite", 255),
];

pub fn gradient_names() -> impl Iterator<Item = &'static str> {
    GRADIENTS.iter().map(|(name, _)| *name)
}

/// Case-insensitive lookup of a single named colour.
pub fn named_color(name: &str) -> Option<Rgb> {
    let name = name.to_ascii_lowercase();
    COLOR_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| xterm_to_rgb(code))
}

/// Ordered colour stops sampled as an evenly spaced gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    stops: Vec<Rgb>,
}

impl Palette {
    /// `None` when `stops` is empty.
    pub fn new(stops: Vec<Rgb>) -> Option<Self> {
        if stops.is_empty() {
            None
        } else {
            Some(Self { stops })
        }
    }

    pub fn solid(color: Rgb) -> Self {
        Self { stops: vec![color] }
    }

    /// Case-insensitive lookup of a named gradient.
    pub fn named(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        GRADIENTS.iter().find(|(n, _)| *n == name).map(|(_, codes)| Self {
            stops: codes.iter().map(|&c| xterm_to_rgb(c)).collect(),
        })
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped.
    pub fn sample(&self, t: f32) -> Rgb {
        let last = self.stops.len() - 1;
        if last == 0 {
            return self.stops[0];
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * last as f32;
        let i = (pos.floor() as usize).min(last - 1);
        self.stops[i].lerp(self.stops[i + 1], pos - i as f32)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::solid(Rgb::WHITE)
    }
}
