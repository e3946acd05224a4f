use ndarray::{Array1, Array2, ArrayView1, Axis};
use crate::spectral::PsdError;
/// Indices of the bins of `freqs` that fall inside `[fmin, fmax]`, ascending.
pub fn band_indices(freqs: ArrayView1<'_, f64>, fmin: f64, fmax: f64) -> Result<Vec<usize>, PsdError> {
    if fmin.is_nan() || fmax.is_nan() || fmin < 0.0 || fmin >= fmax {
        return Err(PsdError::InvalidRange {
            what: "frequency",
            low: fmin,
            high: fmax,
        });
    }
    let indices: Vec<usize> = freqs
        .iter()
        .enumerate()
        .filter_map(|(k, &f)| (f >= fmin && f <= fmax).then_some(k))
        .collect();
    if indices.is_empty() {
        return Err(PsdError::EmptyBand {
            fmin,
            fmax,
            nyquist: freqs.iter().copied().fold(0.0, f64::max),
        });
    }
    Ok(indices)
}
/// Keep the same frequency columns of every row.
pub fn select_band(
    psds: &Array2<f64>,
    freqs: &Array1<f64>,
    fmin: f64,
    fmax: f64,
) -> Result<(Array2<f64>, Array1<f64>), PsdError> {
    if psds.ncols() != freqs.len() {
        return Err(PsdError::ShapeMismatch {
            context: "frequency axis",
            expected: psds.ncols(),
            actual: freqs.len(),
        });
    }
    let indices = band_indices(freqs.view(), fmin, fmax)?;
    Ok((psds.select(Axis(1), &indices), freqs.select(Axis(0), &indices)))
}
