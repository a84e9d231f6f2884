//! stemnote-io: Dataset loading and annotation export for stemnote.
//!
//! Datasets are read from NumPy `.npz` archives (and HDF5 files with the
//! `hdf5` feature). Spots are written as plain text or JSON, rendered
//! images as 8-bit PNG.
//!

mod error;
#[cfg(feature = "hdf5")]
pub mod hdf5;
pub mod npz;
mod writer;

use std::path::Path;
use stemnote_core::Dataset;

pub use error::{Error, Result};
#[cfg(feature = "hdf5")]
pub use hdf5::read_hdf5_dataset;
pub use npz::read_npz_dataset;
pub use writer::{format_spot, save_gray_png, spot_header, SpotFileWriter};

/// Loads a 4D dataset, choosing the reader from the file extension.
///
/// # Errors
/// Returns an error for unknown extensions or when the reader fails.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let loaded = match ext.as_str() {
        "npz" => read_npz_dataset(path),
        #[cfg(feature = "hdf5")]
        "h5" | "hdf5" => read_hdf5_dataset(path),
        other => Err(Error::InvalidFormat(format!(
            "unsupported file extension '{other}'"
        ))),
    };

    match loaded {
        Ok((name, dataset)) => {
            let (rows, cols, ky, kx) = dataset.shape();
            log::info!(
                "Loaded '{name}' from {}: {rows}x{cols} scan, {ky}x{kx} patterns",
                path.display()
            );
            Ok(dataset)
        }
        Err(e) => {
            log::warn!("Rejected {}: {e}", path.display());
            Err(e)
        }
    }
}
