use ndarray::{s, Array2, Array3, ArrayView2, Axis};
use crate::spectral::config::TimeWindow;
use crate::spectral::PsdError;
fn validate_sfreq(sfreq: f64) -> Result<(), PsdError> {
    if !sfreq.is_finite() || sfreq <= 0.0 {
        return Err(PsdError::InvalidSampleRate);
    }
    Ok(())
}
/// Continuous multichannel recording held in memory.
#[derive(Clone, Debug)]
pub struct SignalSegment {
    data: Array2<f64>, // channels x samples
    sfreq: f64,
}
impl SignalSegment {
    pub fn new(data: Array2<f64>, sfreq: f64) -> Result<Self, PsdError> {
        validate_sfreq(sfreq)?;
        Ok(Self { data, sfreq })
    }
    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
    pub fn sfreq(&self) -> f64 {
        self.sfreq
    }
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }
    pub fn duration_seconds(&self) -> f64 {
        self.n_samples() as f64 / self.sfreq
    }
    /// Nearest sample index for a time in seconds.
    pub fn time_as_index(&self, seconds: f64) -> usize {
        (seconds * self.sfreq).round().max(0.0) as usize
    }
    /// Borrow the samples between `tmin` and `tmax`, both inclusive.
    ///
    /// A missing `tmax`, or one past the end of the recording, stops at the
    /// last sample.
    pub fn crop(&self, window: &TimeWindow) -> Result<ArrayView2<'_, f64>, PsdError> {
        let n_samples = self.n_samples();
        let last_time = n_samples.saturating_sub(1) as f64 / self.sfreq;
        let tmax = window.tmax.unwrap_or(last_time);
        let invalid = PsdError::InvalidRange {
            what: "time",
            low: window.tmin,
            high: tmax,
        };
        if !window.tmin.is_finite() || window.tmin < 0.0 || tmax.is_nan() || window.tmin >= tmax {
            return Err(invalid);
        }
        let start = self.time_as_index(window.tmin);
        if start >= n_samples {
            return Err(invalid);
        }
        let mut stop = if tmax.is_finite() {
            self.time_as_index(tmax)
        } else {
            n_samples - 1
        };
        if stop >= n_samples {
            log::warn!(
                "tmax ({tmax:.3} s) is past the end of the data ({last_time:.3} s), clamping"
            );
            stop = n_samples - 1;
        }
        Ok(self.data.slice(s![.., start..=stop]))
    }
}
/// Fixed-length epochs sharing channel count, length and sample rate.
#[derive(Clone, Debug)]
pub struct Epochs {
    data: Array3<f64>, // epochs x channels x samples
    sfreq: f64,
}
impl Epochs {
    pub fn new(data: Array3<f64>, sfreq: f64) -> Result<Self, PsdError> {
        validate_sfreq(sfreq)?;
        Ok(Self { data, sfreq })
    }
    /// Stack individual segments into one collection.
    pub fn from_segments(segments: &[SignalSegment]) -> Result<Self, PsdError> {
        let first = segments.first().ok_or(PsdError::ShapeMismatch {
            context: "epoch count",
            expected: 1,
            actual: 0,
        })?;
        for segment in &segments[1..] {
            if segment.sfreq != first.sfreq {
                return Err(PsdError::SampleRateMismatch {
                    expected: first.sfreq,
                    actual: segment.sfreq,
                });
            }
            if segment.n_channels() != first.n_channels() {
                return Err(PsdError::ShapeMismatch {
                    context: "epoch channel count",
                    expected: first.n_channels(),
                    actual: segment.n_channels(),
                });
            }
            if segment.n_samples() != first.n_samples() {
                return Err(PsdError::ShapeMismatch {
                    context: "epoch length",
                    expected: first.n_samples(),
                    actual: segment.n_samples(),
                });
            }
        }
        let views: Vec<ArrayView2<'_, f64>> = segments.iter().map(|s| s.data()).collect();
        let data = ndarray::stack(Axis(0), &views).map_err(|_| PsdError::ShapeMismatch {
            context: "epoch",
            expected: first.n_samples(),
            actual: 0,
        })?;
        Self::new(data, first.sfreq)
    }
    pub fn sfreq(&self) -> f64 {
        self.sfreq
    }
    pub fn n_epochs(&self) -> usize {
        self.data.len_of(Axis(0))
    }
    pub fn n_channels(&self) -> usize {
        self.data.len_of(Axis(1))
    }
    pub fn n_samples(&self) -> usize {
        self.data.len_of(Axis(2))
    }
    pub fn epoch(&self, index: usize) -> Option<ArrayView2<'_, f64>> {
        (index < self.n_epochs()).then(|| self.data.index_axis(Axis(0), index))
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ArrayView2<'_, f64>> {
        self.data.outer_iter()
    }
}
