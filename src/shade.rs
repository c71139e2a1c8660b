//! Flat shading: a single directional light and an intensity-to-glyph ramp.

use crate::math::Vec3;
use crate::mesh::face_normal;

pub const DEFAULT_RAMP: &str = ".,:;*!?#@";
pub const DEFAULT_LIGHT: Vec3 = Vec3::new(1.0, 1.0, -1.0);

/// Non-empty glyph sequence, emptiest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    glyphs: Vec<char>,
}

impl Ramp {
    /// `None` for an empty string.
    pub fn new(chars: &str) -> Option<Self> {
        let glyphs: Vec<char> = chars.chars().collect();
        if glyphs.is_empty() {
            None
        } else {
            Some(Self { glyphs })
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always `false`: [`Ramp::new`] refuses empty input.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `floor(intensity * (len - 1))`, clamped into the ramp.
    pub fn glyph_for(&self, intensity: f32) -> char {
        let last = self.glyphs.len() - 1;
        let index = (intensity * last as f32).floor();
        let index = if index.is_nan() { 0 } else { (index.max(0.0) as usize).min(last) };
        self.glyphs[index]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_RAMP.chars().collect(),
        }
    }
}

/// Whether `c` takes exactly one terminal column.
///
/// Conservative: printable characters below U+1100 other than combining
/// marks, plus box drawing and block elements. Anything else may render
/// wide or zero-width and would shift the rest of the row.
pub fn is_single_width(c: char) -> bool {
    if c.is_control() {
        return false;
    }
    match c as u32 {
        0x0300..=0x036F => false,
        0x0000..=0x10FF => true,
        0x2500..=0x259F => true,
        _ => false,
    }
}

/// Lambert term of the triangle `v1 v2 v3` against a normalized light.
///
/// Positive when the outward face normal leans toward the light.
pub fn face_intensity(v1: Vec3, v2: Vec3, v3: Vec3, light: Vec3) -> f32 {
    face_normal(v1, v2, v3).dot(light)
}
