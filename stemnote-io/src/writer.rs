//! File writers for spot annotations and rendered images.

use crate::Result;
use ndarray::Array2;
use stemnote_core::{DisplayTarget, NormalizedCoord, PatternAnnotations};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header line naming the pattern a spot list belongs to.
#[must_use]
pub fn spot_header(target: DisplayTarget) -> String {
    format!("# stemnote spots, {target}, columns: x y (normalized)")
}

/// One spot per line, `x y` with six decimals.
#[must_use]
pub fn format_spot(coord: NormalizedCoord) -> String {
    format!("{:.6} {:.6}", coord.x, coord.y)
}

/// Writer for spot annotation output.
///
/// Text output is one `x y` pair per line in creation order, preceded by a
/// `#` header line, so it loads directly with `numpy.loadtxt`.
pub struct SpotFileWriter {
    writer: BufWriter<File>,
}

impl SpotFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes the spots of one pattern as text.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_text<I>(&mut self, target: DisplayTarget, spots: I) -> Result<usize>
    where
        I: IntoIterator<Item = NormalizedCoord>,
    {
        writeln!(self.writer, "{}", spot_header(target))?;
        let mut count = 0;
        for coord in spots {
            writeln!(self.writer, "{}", format_spot(coord))?;
            count += 1;
        }
        self.writer.flush()?;
        Ok(count)
    }

    /// Writes every annotated pattern as a JSON array.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn write_json(&mut self, annotations: &[PatternAnnotations]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, annotations)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Saves an 8-bit single-channel image as PNG.
///
/// # Errors
/// Returns an error if the image cannot be encoded or written.
pub fn save_gray_png<P: AsRef<Path>>(path: P, pixels: &Array2<u8>) -> Result<()> {
    let (height, width) = pixels.dim();
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(crate::Error::InvalidFormat(format!(
            "image {width}x{height} too large for PNG"
        )));
    };
    let buffer: Vec<u8> = pixels.iter().copied().collect();
    let Some(image) = image::GrayImage::from_raw(w, h, buffer) else {
        return Err(crate::Error::InvalidFormat(
            "pixel buffer does not match image size".to_string(),
        ));
    };
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
