//! HDF5 dataset loading.

use crate::{Error, Result};
use hdf5::File;
use ndarray::Ix4;
use std::path::Path;
use stemnote_core::Dataset;

/// Loads the first 4-dimensional dataset at the file root.
///
/// Members are visited in the order HDF5 reports them; groups and
/// datasets of any other rank are skipped.
///
/// # Errors
/// Returns an error if the file cannot be read or holds no 4-D dataset.
pub fn read_hdf5_dataset<P: AsRef<Path>>(path: P) -> Result<(String, Dataset)> {
    let file = File::open(path)?;
    for name in file.member_names()? {
        let Ok(ds) = file.dataset(&name) else {
            continue;
        };
        if ds.ndim() != 4 {
            log::debug!("skipping '{name}': {}-D", ds.ndim());
            continue;
        }
        let array = ds.read_dyn::<f64>()?;
        let array = array
            .into_dimensionality::<Ix4>()
            .map_err(|e| Error::InvalidFormat(format!("dataset '{name}': {e}")))?;
        return Ok((name, Dataset::new(array)?));
    }
    Err(Error::InvalidFormat(
        "file contains no 4-D dataset at the root".to_string(),
    ))
}
