use ndarray::{ArrayView2, Zip};

use crate::prelude::{check_len, DisplayResult, MaskedGrid};

impl MaskedGrid {
    /// Hides NaN and infinite gates.
    pub fn mask_invalid(&mut self) {
        Zip::from(&mut self.mask)
            .and(&self.values)
            .for_each(|masked, value| *masked |= !value.is_finite());
    }

    /// Hides gates below `vmin` or above `vmax`; the bounds themselves stay visible.
    pub fn mask_outside(&mut self, vmin: f64, vmax: f64) {
        Zip::from(&mut self.mask)
            .and(&self.values)
            .for_each(|masked, &value| *masked |= value < vmin || value > vmax);
    }

    /// Hides gates where `other` is below `threshold`, e.g. low coherent power.
    pub fn mask_where_below(&mut self, other: ArrayView2<f64>, threshold: f64) -> DisplayResult<()> {
        let (rows, cols) = self.dim();
        let (other_rows, other_cols) = other.dim();
        check_len("mask field rays", rows, other_rows)?;
        check_len("mask field gates", cols, other_cols)?;
        Zip::from(&mut self.mask)
            .and(&other)
            .for_each(|masked, &value| *masked |= value < threshold);
        Ok(())
    }

    /// Keeps only the listed rows, in order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let axis = ndarray::Axis(0);
        Self {
            values: self.values.select(axis, rows),
            mask: self.mask.select(axis, rows),
        }
    }
}
