use serde::Deserialize;
use crate::spectral::PsdError;
/// Per-segment trend removal applied before tapering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detrend {
    /// Leave segments untouched (matches the classic `psd` defaults).
    #[default]
    None,
    /// Subtract the segment mean.
    Mean,
    /// Subtract the least-squares line through the segment.
    Linear,
}
/// Options shared by the continuous and epoched estimators.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PsdConfig {
    /// Channel indices to keep, in output order. `None` keeps every channel.
    pub picks: Option<Vec<usize>>,
    /// Lower edge of the returned band in Hz, inclusive.
    pub fmin: f64,
    /// Upper edge of the returned band in Hz, inclusive. Infinite means up to Nyquist.
    pub fmax: f64,
    /// Welch window length. Clamped to the available samples.
    pub nfft: usize,
    /// Apply the projector (if one is supplied) before estimation.
    pub proj: bool,
    /// Worker count for the per-channel FFT work. 1 is sequential, 0 uses every core.
    pub n_jobs: usize,
    pub detrend: Detrend,
}
impl Default for PsdConfig {
    fn default() -> Self {
        Self {
            picks: None,
            fmin: 0.0,
            fmax: f64::INFINITY,
            nfft: 2048,
            proj: false,
            n_jobs: 1,
            detrend: Detrend::None,
        }
    }
}
impl PsdConfig {
    pub fn validate(&self) -> Result<(), PsdError> {
        if self.nfft == 0 {
            return Err(PsdError::InvalidNfft);
        }
        if self.fmin.is_nan() || self.fmax.is_nan() || self.fmin < 0.0 || self.fmin >= self.fmax {
            return Err(PsdError::InvalidRange {
                what: "frequency",
                low: self.fmin,
                high: self.fmax,
            });
        }
        Ok(())
    }
    /// Resolve `picks` against a channel count, checking bounds and uniqueness.
    pub fn resolve_picks(&self, n_channels: usize) -> Result<Vec<usize>, PsdError> {
        let picks = match &self.picks {
            Some(picks) => picks.clone(),
            None => (0..n_channels).collect(),
        };
        if picks.is_empty() {
            return Err(PsdError::InvalidSelection("no channels selected".into()));
        }
        let mut seen = vec![false; n_channels];
        for &pick in &picks {
            if pick >= n_channels {
                return Err(PsdError::InvalidSelection(format!(
                    "channel index {pick} out of range for {n_channels} channels"
                )));
            }
            if std::mem::replace(&mut seen[pick], true) {
                return Err(PsdError::InvalidSelection(format!(
                    "channel index {pick} selected more than once"
                )));
            }
        }
        Ok(picks)
    }
}
/// Crop window for continuous data, in seconds from the first sample.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeWindow {
    pub tmin: f64,
    /// `None` runs to the end of the recording.
    pub tmax: Option<f64>,
}
impl TimeWindow {
    pub fn new(tmin: f64, tmax: Option<f64>) -> Self {
        Self { tmin, tmax }
    }
}
impl Default for TimeWindow {
    fn default() -> Self {
        TimeWindow {
            tmin: 0.0,
            tmax: None,
        }
    }
}
