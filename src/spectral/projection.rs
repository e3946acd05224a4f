use ndarray::{Array2, ArrayView2, CowArray, Ix2};
use crate::spectral::PsdError;
/// Square linear operator applied across channels, e.g. an SSP noise projector.
#[derive(Clone, Debug)]
pub struct Projector {
    matrix: Array2<f64>,
}
impl Projector {
    pub fn new(matrix: Array2<f64>) -> Result<Self, PsdError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(PsdError::ShapeMismatch {
                context: "projector columns",
                expected: matrix.nrows(),
                actual: matrix.ncols(),
            });
        }
        Ok(Self { matrix })
    }
    pub fn identity(n_channels: usize) -> Self {
        Self {
            matrix: Array2::eye(n_channels),
        }
    }
    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }
    pub fn n_channels(&self) -> usize {
        self.matrix.nrows()
    }
    pub fn check_channels(&self, n_channels: usize) -> Result<(), PsdError> {
        if self.n_channels() != n_channels {
            return Err(PsdError::ShapeMismatch {
                context: "projector channel count",
                expected: n_channels,
                actual: self.n_channels(),
            });
        }
        Ok(())
    }
}
/// Left-multiply the full channel set by the projector.
///
/// Without a projector, or with `enabled == false`, the segment is handed back
/// as a borrowed view.
pub fn apply_projection<'a>(
    segment: ArrayView2<'a, f64>,
    projector: Option<&Projector>,
    enabled: bool,
) -> Result<CowArray<'a, f64, Ix2>, PsdError> {
    match projector {
        Some(projector) if enabled => {
            projector.check_channels(segment.nrows())?;
            Ok(CowArray::from(projector.matrix.dot(&segment)))
        }
        _ => Ok(CowArray::from(segment)),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    #[test]
    fn disabled_projection_borrows() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let projector = Projector::new(array![[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let out = apply_projection(data.view(), Some(&projector), false).unwrap();
        assert!(out.is_view());
        assert_eq!(out, data);
        let out = apply_projection(data.view(), None, true).unwrap();
        assert!(out.is_view());
    }
    #[test]
    fn enabled_projection_mixes_all_channels() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        // drop the common mode
        let third = 1.0 / 3.0;
        let projector = Projector::new(Array2::eye(3) - Array2::from_elem((3, 3), third)).unwrap();
        let out = apply_projection(data.view(), Some(&projector), true).unwrap();
        assert!(out.is_owned());
        assert!((out[[0, 0]] + 2.0).abs() < 1e-12);
        assert!((out[[1, 1]]).abs() < 1e-12);
        assert!((out[[2, 0]] - 2.0).abs() < 1e-12);
    }
    #[test]
    fn identity_projection_is_a_no_op() {
        let data = array![[0.5, -1.5, 2.0], [7.0, 0.25, -3.0]];
        let out = apply_projection(data.view(), Some(&Projector::identity(2)), true).unwrap();
        assert_eq!(out, data);
    }
    #[test]
    fn shape_errors() {
        assert!(matches!(
            Projector::new(Array2::zeros((2, 3))),
            Err(PsdError::ShapeMismatch { .. })
        ));
        let data = Array2::<f64>::zeros((3, 8));
        assert!(matches!(
            apply_projection(data.view(), Some(&Projector::identity(2)), true),
            Err(PsdError::ShapeMismatch {
                context: "projector channel count",
                expected: 3,
                actual: 2
            })
        ));
    }
}
