//! Colormap definitions and application logic.

use crate::util::f32_to_u8;

/// Available colormaps for the virtual image and diffraction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Grayscale - black to white.
    #[default]
    Grayscale,
    /// Green (Matrix style) - black to bright green.
    Green,
    /// Hot (Thermal) - black to red to yellow to white.
    Hot,
    /// Viridis (approximate) - blue to teal to green to yellow.
    Viridis,
}

impl Colormap {
    /// Every colormap, in menu order.
    pub const ALL: [Colormap; 4] = [
        Colormap::Grayscale,
        Colormap::Green,
        Colormap::Hot,
        Colormap::Viridis,
    ];
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Colormap::Grayscale => write!(f, "Grayscale"),
            Colormap::Green => write!(f, "Green (Matrix)"),
            Colormap::Hot => write!(f, "Hot (Thermal)"),
            Colormap::Viridis => write!(f, "Viridis"),
        }
    }
}

impl Colormap {
    /// Apply the colormap to a normalized value [0, 1] and return RGBA bytes.
    #[must_use]
    pub fn apply(self, val: f32) -> [u8; 4] {
        let val = val.clamp(0.0, 1.0);
        match self {
            Colormap::Grayscale => {
                let v = f32_to_u8(val * 255.0);
                [v, v, v, 255]
            }
            Colormap::Green => {
                let v = f32_to_u8(val * 255.0);
                [0, v, 0, 255]
            }
            Colormap::Hot => {
                // red, then green, then blue ramp up over one third each
                let t = val * 3.0;
                [
                    f32_to_u8(t * 255.0),
                    f32_to_u8((t - 1.0) * 255.0),
                    f32_to_u8((t - 2.0) * 255.0),
                    255,
                ]
            }
            Colormap::Viridis => {
                let r = f32_to_u8(255.0 * val.powf(2.0));
                let g = f32_to_u8(255.0 * val);
                let b = f32_to_u8(255.0 * (1.0 - val));
                [r, g, b, 255]
            }
        }
    }

    /// Map an 8-bit intensity through the colormap.
    #[must_use]
    pub fn apply_u8(self, level: u8) -> [u8; 4] {
        self.apply(f32::from(level) / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_is_identity() {
        for level in [0u8, 1, 127, 254, 255] {
            assert_eq!(Colormap::Grayscale.apply_u8(level), [level, level, level, 255]);
        }
    }

    #[test]
    fn test_hot_endpoints() {
        assert_eq!(Colormap::Hot.apply(0.0), [0, 0, 0, 255]);
        assert_eq!(Colormap::Hot.apply(0.5), [255, 128, 0, 255]);
        assert_eq!(Colormap::Hot.apply(1.0), [255, 255, 255, 255]);
    }
}
