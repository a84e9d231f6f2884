//! NumPy `.npz` dataset loading.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use ndarray::{ArrayD, Ix4, IxDyn, OwnedRepr};
use ndarray_npy::{NpzReader, ReadNpzError};
use stemnote_core::Dataset;

use crate::{Error, Result};

/// Loads the first array of an `.npz` archive as a 4D dataset.
///
/// The entry name is ignored. Integer and float element types are widened
/// to `f64`.
///
/// # Errors
/// Returns an error if the file cannot be opened, the archive is empty, the
/// element type is unsupported, or the array is not 4-dimensional with
/// non-zero extents.
pub fn read_npz_dataset<P: AsRef<Path>>(path: P) -> Result<(String, Dataset)> {
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file)?;
    let names = npz.names()?;
    let Some(name) = names.first().cloned() else {
        return Err(Error::InvalidFormat("archive contains no arrays".to_string()));
    };
    let array = read_first_widened(&mut npz)?;
    let ndim = array.ndim();
    let array = array.into_dimensionality::<Ix4>().map_err(|_| {
        Error::InvalidFormat(format!("array '{name}' is {ndim}-D, expected 4-D"))
    })?;
    Ok((name, Dataset::new(array)?))
}

/// Reads entry 0 as whichever supported element type it is stored in.
#[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
fn read_first_widened<R: Read + Seek>(npz: &mut NpzReader<R>) -> Result<ArrayD<f64>> {
    let mut last_err: Option<ReadNpzError> = None;

    macro_rules! try_elem {
        ($($t:ty),+) => {
            $(
                match npz.by_index::<OwnedRepr<$t>, IxDyn>(0) {
                    Ok(array) => return Ok(array.mapv(|v| v as f64)),
                    Err(e) => {
                        let _ = last_err.replace(e);
                    }
                }
            )+
        };
    }

    try_elem!(f64, f32, u16, u8, u32, i32, i16, i8, u64, i64);

    Err(Error::InvalidFormat(match last_err {
        Some(e) => format!("unsupported array element type ({e})"),
        None => "unsupported array element type".to_string(),
    }))
}
