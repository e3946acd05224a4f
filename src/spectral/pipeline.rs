use std::iter::FusedIterator;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use crate::spectral::band::band_indices;
use crate::spectral::config::{PsdConfig, TimeWindow};
use crate::spectral::dispatch::Dispatcher;
use crate::spectral::error::PsdError;
use crate::spectral::projection::{apply_projection, Projector};
use crate::spectral::segment::{Epochs, SignalSegment};
use crate::spectral::welch::WelchEstimator;
/// Power per Hz for each picked channel, restricted to the requested band.
#[derive(Clone, Debug)]
pub struct PsdResult {
    pub psds: Array2<f64>, // picks x freqs
    pub freqs: Array1<f64>,
}
impl PsdResult {
    pub fn n_channels(&self) -> usize {
        self.psds.nrows()
    }
    pub fn n_freqs(&self) -> usize {
        self.freqs.len()
    }
}
/// Everything that depends only on the configuration and the segment shape.
/// Built once per call, reused for every epoch.
struct PsdPlan {
    picks: Vec<usize>,
    proj: bool,
    welch: WelchEstimator,
    dispatcher: Dispatcher,
    band: Vec<usize>,
    freqs: Array1<f64>,
}
impl PsdPlan {
    fn new(
        config: &PsdConfig,
        n_channels: usize,
        n_samples: usize,
        sfreq: f64,
        projector: Option<&Projector>,
    ) -> Result<Self, PsdError> {
        config.validate()?;
        let picks = config.resolve_picks(n_channels)?;
        if config.proj {
            match projector {
                Some(projector) => projector.check_channels(n_channels)?,
                None => log::debug!("projection requested but no projector supplied"),
            }
        }
        let welch = WelchEstimator::new(config.nfft, n_samples, sfreq, config.detrend)?;
        let all_freqs = welch.frequencies();
        let band = band_indices(all_freqs.view(), config.fmin, config.fmax)?;
        let freqs = all_freqs.select(Axis(0), &band);
        let dispatcher = Dispatcher::new(config.n_jobs)?;
        log::info!(
            "Effective window size : {:.3} (s)",
            welch.nperseg() as f64 / sfreq
        );
        Ok(Self {
            picks,
            proj: config.proj,
            welch,
            dispatcher,
            band,
            freqs,
        })
    }
    fn run(
        &self,
        segment: ArrayView2<'_, f64>,
        projector: Option<&Projector>,
    ) -> Result<PsdResult, PsdError> {
        let projected = apply_projection(segment, projector, self.proj)?;
        let data = projected.view();
        let rows = self.dispatcher.dispatch(&self.picks, |ch| {
            let psd = self.welch.estimate(data.row(ch), ch)?;
            Ok(self.band.iter().map(|&k| psd[k]).collect::<Vec<f64>>())
        })?;
        let mut psds = Array2::zeros((self.picks.len(), self.band.len()));
        for (mut out, row) in psds.rows_mut().into_iter().zip(&rows) {
            out.assign(&ArrayView1::from(row.as_slice()));
        }
        Ok(PsdResult {
            psds,
            freqs: self.freqs.clone(),
        })
    }
}
/// Welch PSD of a continuous recording cropped to `window`.
///
/// The projector, when enabled, is applied to every channel before `picks`
/// are taken. All arguments are validated before any FFT runs.
pub fn compute_raw_psd(
    raw: &SignalSegment,
    window: &TimeWindow,
    projector: Option<&Projector>,
    config: &PsdConfig,
) -> Result<PsdResult, PsdError> {
    let data = raw.crop(window)?;
    log::debug!(
        "raw PSD over {} channels x {} samples ({:.3} s)",
        data.nrows(),
        data.ncols(),
        data.ncols() as f64 / raw.sfreq()
    );
    let plan = PsdPlan::new(config, raw.n_channels(), data.ncols(), raw.sfreq(), projector)?;
    plan.run(data, projector)
}
/// Lazily computes one PSD per epoch, in order.
///
/// Validation happens here, before the first epoch is touched. Each call
/// starts again from the first epoch.
pub fn compute_epochs_psd<'a>(
    epochs: &'a Epochs,
    projector: Option<&'a Projector>,
    config: &PsdConfig,
) -> Result<EpochPsdIter<'a>, PsdError> {
    let plan = PsdPlan::new(
        config,
        epochs.n_channels(),
        epochs.n_samples(),
        epochs.sfreq(),
        projector,
    )?;
    Ok(EpochPsdIter {
        epochs,
        projector,
        plan,
        next: 0,
    })
}
/// Iterator returned by [`compute_epochs_psd`].
pub struct EpochPsdIter<'a> {
    epochs: &'a Epochs,
    projector: Option<&'a Projector>,
    plan: PsdPlan,
    next: usize,
}
impl<'a> EpochPsdIter<'a> {
    /// Frequency axis shared by every item.
    pub fn freqs(&self) -> &Array1<f64> {
        &self.plan.freqs
    }
}
impl<'a> Iterator for EpochPsdIter<'a> {
    type Item = Result<PsdResult, PsdError>;
    fn next(&mut self) -> Option<Self::Item> {
        let epoch = self.epochs.epoch(self.next)?;
        log::debug!("epoch {} of {}", self.next + 1, self.epochs.n_epochs());
        self.next += 1;
        Some(self.plan.run(epoch, self.projector))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.epochs.n_epochs().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
impl<'a> ExactSizeIterator for EpochPsdIter<'a> {}
impl<'a> FusedIterator for EpochPsdIter<'a> {}
