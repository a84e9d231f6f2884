//! Reductions of the 4D dataset to displayable 8-bit images.
//!
//! Sums run in `f64`. Rescaling maps the observed `[min, max]` of a reduced
//! image linearly onto `[0, 255]`. A flat image (`max == min`, or no finite
//! sample at all) rescales to all zeros.

use ndarray::{Array2, ArrayBase, ArrayView2, Axis, Data, Ix2};

use crate::dataset::Dataset;
use crate::grid::{ScanIndex, ScanRegion};
use crate::navigation::DisplayTarget;
use crate::Result;

/// Value every pixel of a flat-field reduction is set to.
pub const FLAT_FIELD_VALUE: u8 = 0;

/// Sum over the two pattern axes: one value per scan point, `(rows, cols)`.
#[must_use]
pub fn virtual_image_sum(dataset: &Dataset) -> Array2<f64> {
    dataset.view().sum_axis(Axis(3)).sum_axis(Axis(2))
}

/// Element-wise sum of all patterns inside `region`, `(height, width)`.
///
/// # Errors
/// Returns [`crate::Error::InvalidRegion`] if the region is empty or exceeds the grid.
pub fn region_sum(dataset: &Dataset, region: ScanRegion) -> Result<Array2<f64>> {
    let view = dataset.region(region)?;
    Ok(view.sum_axis(Axis(0)).sum_axis(Axis(0)))
}

/// Pattern recorded at one scan point, borrowed from the dataset.
///
/// # Errors
/// Returns [`crate::Error::IndexOutOfRange`] outside the scan grid.
pub fn single_pattern(dataset: &Dataset, index: ScanIndex) -> Result<ArrayView2<'_, f64>> {
    dataset.pattern(index)
}

/// Raw (unscaled) pattern for a display target.
///
/// # Errors
/// Returns an error if the target lies outside the dataset's scan grid.
pub fn target_sum(dataset: &Dataset, target: DisplayTarget) -> Result<Array2<f64>> {
    match target {
        DisplayTarget::SinglePoint(index) => Ok(single_pattern(dataset, index)?.to_owned()),
        DisplayTarget::CombinedRegion(region) => region_sum(dataset, region),
    }
}

/// Finite `(min, max)` of `values`, `None` if there is no finite sample.
#[must_use]
pub fn finite_range<S>(values: &ArrayBase<S, Ix2>) -> Option<(f64, f64)>
where
    S: Data<Elem = f64>,
{
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `round(255 * (v - min) / (max - min))`, clamped to `[0, 255]`.
///
/// Non-finite samples map to 0. Flat input maps to [`FLAT_FIELD_VALUE`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rescale_to_u8<S>(values: &ArrayBase<S, Ix2>) -> Array2<u8>
where
    S: Data<Elem = f64>,
{
    let Some((min, max)) = finite_range(values) else {
        return Array2::from_elem(values.raw_dim(), FLAT_FIELD_VALUE);
    };
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return Array2::from_elem(values.raw_dim(), FLAT_FIELD_VALUE);
    }
    values.mapv(|v| {
        if v.is_finite() {
            (255.0 * (v - min) / span).round().clamp(0.0, 255.0) as u8
        } else {
            0
        }
    })
}

/// The virtual STEM image, rescaled for display.
#[must_use]
pub fn render_virtual_image(dataset: &Dataset) -> Array2<u8> {
    rescale_to_u8(&virtual_image_sum(dataset))
}

/// The diffraction pattern of a display target, rescaled for display.
///
/// # Errors
/// Returns an error if the target lies outside the dataset's scan grid.
pub fn render_pattern(dataset: &Dataset, target: DisplayTarget) -> Result<Array2<u8>> {
    Ok(rescale_to_u8(&target_sum(dataset, target)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array4};

    #[allow(clippy::cast_precision_loss)]
    fn ramp() -> Dataset {
        Dataset::from_fn((3, 4, 2, 3), |(r, c, y, x)| {
            (r * 1000 + c * 100 + y * 10 + x) as f64
        })
        .unwrap()
    }

    #[test]
    fn test_virtual_image_sums_pattern_axes() {
        let ds = ramp();
        let img = virtual_image_sum(&ds);
        assert_eq!(img.dim(), (3, 4));
        // 6 samples, pattern part sums to 0+1+2+10+11+12 = 36
        assert_relative_eq!(img[[1, 2]], 6.0 * 1200.0 + 36.0);
    }

    #[test]
    fn test_single_point_region_equals_pattern() {
        let ds = ramp();
        let index = ScanIndex::new(3, 2);
        let summed = region_sum(&ds, ScanRegion::single(index)).unwrap();
        assert_eq!(summed, single_pattern(&ds, index).unwrap());
        assert_eq!(
            render_pattern(&ds, DisplayTarget::CombinedRegion(ScanRegion::single(index))).unwrap(),
            render_pattern(&ds, DisplayTarget::SinglePoint(index)).unwrap()
        );
    }

    #[test]
    fn test_region_sum_adds_every_point_once() {
        let ds = ramp();
        let summed = region_sum(&ds, ScanRegion::new(1, 0, 3, 2)).unwrap();
        // points (col 1..3, row 0..2): scan part 0+100 + 0+200 + 1000+100 + 1000+200
        assert_relative_eq!(summed[[0, 0]], 2600.0);
        assert_relative_eq!(summed[[1, 2]], 2600.0 + 4.0 * 12.0);
    }

    #[test]
    fn test_full_region_matches_total_intensity() {
        let ds = ramp();
        let total: f64 = region_sum(&ds, ds.grid().full_region()).unwrap().sum();
        assert_relative_eq!(total, virtual_image_sum(&ds).sum());
    }

    #[test]
    fn test_rescale_spans_full_range() {
        let out = rescale_to_u8(&array![[10.0, 20.0], [30.0, 40.0]]);
        assert_eq!(out, array![[0, 85], [170, 255]]);
    }

    #[test]
    fn test_flat_field_is_zero() {
        let ds = Dataset::new(Array4::from_elem((2, 2, 3, 3), 7.0)).unwrap();
        let img = render_virtual_image(&ds);
        assert!(img.iter().all(|&v| v == FLAT_FIELD_VALUE));
        let pattern =
            render_pattern(&ds, DisplayTarget::CombinedRegion(ds.grid().full_region())).unwrap();
        assert!(pattern.iter().all(|&v| v == FLAT_FIELD_VALUE));
    }

    #[test]
    fn test_non_finite_samples_are_ignored() {
        let out = rescale_to_u8(&array![[f64::NAN, 0.0], [f64::INFINITY, 2.0]]);
        assert_eq!(out, array![[0, 0], [0, 255]]);
        let none = rescale_to_u8(&array![[f64::NAN]]);
        assert_eq!(none, array![[FLAT_FIELD_VALUE]]);
    }

    #[test]
    fn test_large_integer_counts_do_not_saturate() {
        let ds = Dataset::from_fn((1, 2, 64, 64), |(_, c, _, _)| {
            if c == 0 {
                f64::from(u16::MAX)
            } else {
                0.0
            }
        })
        .unwrap();
        let sum = virtual_image_sum(&ds);
        assert_relative_eq!(sum[[0, 0]], 64.0 * 64.0 * f64::from(u16::MAX));
        assert_eq!(render_virtual_image(&ds), array![[255, 0]]);
    }
}
