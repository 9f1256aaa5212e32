//! Colors: the fixed palette, per-label assignment, shuffling and alpha conversion.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Serializer};

use crate::error::AppError;

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = AppError;

    /// Parse `#RRGGBB` (the leading `#` is optional). Short and named forms are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::new(2, format!("Expected a #RRGGBB color (got: {s}).")));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| AppError::new(2, format!("Invalid color component in {s}: {e}")))
        };
        Ok(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
    }
}

/// RGB color plus opacity in `[0, 1]`. Displays and serializes as `rgba(r,g,b,a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Composite this color over an opaque background.
    pub fn over(self, bg: Rgb) -> Rgb {
        let mix = |fg: u8, bg: u8| (fg as f64 * self.a + bg as f64 * (1.0 - self.a)).round() as u8;
        Rgb::new(mix(self.r, bg.r), mix(self.g, bg.g), mix(self.b, bg.b))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Convert a `#RRGGBB` color and an opacity into an `rgba(...)` string.
pub fn with_alpha(hex: &str, alpha: f64) -> Result<String, AppError> {
    let rgb: Rgb = hex.parse()?;
    Ok(rgb.with_alpha(alpha).to_string())
}

/// Twelve distinct hues, in default assignment order.
pub const PALETTE: [Rgb; 12] = [
    Rgb::new(0x63, 0x66, 0xF1), // indigo
    Rgb::new(0x22, 0xC5, 0x5E), // green
    Rgb::new(0xF5, 0x9E, 0x0B), // amber
    Rgb::new(0xEF, 0x44, 0x44), // red
    Rgb::new(0x06, 0xB6, 0xD4), // cyan
    Rgb::new(0xA8, 0x55, 0xF7), // purple
    Rgb::new(0x84, 0xCC, 0x16), // lime
    Rgb::new(0xF9, 0x73, 0x16), // orange
    Rgb::new(0x14, 0xB8, 0xA6), // teal
    Rgb::new(0xEC, 0x48, 0x99), // pink
    Rgb::new(0x3B, 0x82, 0xF6), // blue
    Rgb::new(0xEA, 0xB3, 0x08), // yellow
];

/// Assign `palette[i % len]` to each of `n` series. More series than colors cycle.
pub fn assign_colors(palette: &[Rgb], n: usize) -> Vec<Rgb> {
    if palette.is_empty() {
        return Vec::new();
    }
    (0..n).map(|i| palette[i % palette.len()]).collect()
}

/// In-place Fisher–Yates shuffle: every permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// A freshly shuffled copy of the palette.
pub fn shuffled_palette<R: Rng + ?Sized>(rng: &mut R) -> Vec<Rgb> {
    let mut colors = PALETTE.to_vec();
    shuffle(&mut colors, rng);
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn with_alpha_formats_rgba() {
        assert_eq!(with_alpha("#FFFFFF", 1.0).unwrap(), "rgba(255,255,255,1)");
        assert_eq!(with_alpha("#000000", 0.5).unwrap(), "rgba(0,0,0,0.5)");
        assert_eq!(with_alpha("#6366f1", 0.95).unwrap(), "rgba(99,102,241,0.95)");
    }

    #[test]
    fn with_alpha_rejects_short_and_named_colors() {
        assert!(with_alpha("#FFF", 1.0).is_err());
        assert!(with_alpha("red", 1.0).is_err());
        assert!(with_alpha("#GGGGGG", 1.0).is_err());
    }

    #[test]
    fn palette_is_twelve_distinct_hues() {
        let unique: HashSet<_> = PALETTE.iter().collect();
        assert_eq!(unique.len(), 12);
        for c in PALETTE {
            assert_eq!(c.hex().parse::<Rgb>().unwrap(), c);
        }
    }

    #[test]
    fn assignment_cycles_modulo_palette() {
        for n in [0usize, 1, 5, 12, 13, 30] {
            let colors = assign_colors(&PALETTE, n);
            assert_eq!(colors.len(), n);
            for (i, c) in colors.iter().enumerate() {
                assert_eq!(*c, PALETTE[i % 12]);
            }
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let shuffled = shuffled_palette(&mut rng);
            assert_eq!(shuffled.len(), PALETTE.len());
            let mut a: Vec<_> = shuffled.iter().map(|c| c.hex()).collect();
            let mut b: Vec<_> = PALETTE.iter().map(|c| c.hex()).collect();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn shuffle_reaches_every_permutation_of_three() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..600 {
            let mut items = [1, 2, 3];
            shuffle(&mut items, &mut rng);
            seen.insert(items);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn shuffle_handles_tiny_slices() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: [u8; 0] = [];
        shuffle(&mut empty, &mut rng);
        let mut one = [9];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [9]);
    }

    #[test]
    fn compositing_over_black_scales_channels() {
        let c = Rgb::new(200, 100, 0).with_alpha(0.5);
        assert_eq!(c.over(Rgb::new(0, 0, 0)), Rgb::new(100, 50, 0));
        assert_eq!(c.rgb(), Rgb::new(200, 100, 0));
    }
}
