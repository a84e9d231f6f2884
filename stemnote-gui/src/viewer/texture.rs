//! Texture generation for the virtual image and diffraction pattern.

use egui::ColorImage;
use ndarray::Array2;

use crate::viewer::Colormap;

/// Generate a color image from 8-bit intensities (row-major, `[rows, cols]`).
#[must_use]
pub fn intensity_image(pixels: &Array2<u8>, colormap: Colormap) -> ColorImage {
    let (height, width) = pixels.dim();
    let mut rgba = Vec::with_capacity(width * height * 4);
    for &level in pixels {
        rgba.extend_from_slice(&colormap.apply_u8(level));
    }
    ColorImage::from_rgba_unmultiplied([width, height], &rgba)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_intensity_image_layout() {
        let img = intensity_image(&array![[0u8, 255, 0], [10, 20, 30]], Colormap::Grayscale);
        assert_eq!(img.size, [3, 2]);
        assert_eq!(img.pixels[1], egui::Color32::WHITE);
        assert_eq!(img.pixels[5], egui::Color32::from_gray(30));
    }
}
