use std::f64::consts::PI;
use std::sync::Arc;
use ndarray::{Array1, ArrayView1};
use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use crate::spectral::config::Detrend;
use crate::spectral::PsdError;
/// Symmetric Hann taper.
fn hann_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / denom).cos())
        .collect()
}
/// Start offsets of 50% overlapping windows. Always yields at least one start.
fn segment_starts(n_samples: usize, nperseg: usize) -> Vec<usize> {
    let hop = (nperseg - nperseg / 2).max(1);
    let count = (n_samples - nperseg) / hop + 1;
    (0..count).map(|i| i * hop).collect()
}
fn detrend_in_place(segment: &mut [f64], detrend: Detrend) {
    let n = segment.len() as f64;
    match detrend {
        Detrend::None => {}
        Detrend::Mean => {
            let mean = segment.iter().sum::<f64>() / n;
            segment.iter_mut().for_each(|v| *v -= mean);
        }
        Detrend::Linear => {
            if segment.len() < 2 {
                segment.iter_mut().for_each(|v| *v = 0.0);
                return;
            }
            // least squares against a centred time axis
            let t_mean = (n - 1.0) / 2.0;
            let y_mean = segment.iter().sum::<f64>() / n;
            let (mut sxy, mut sxx) = (0.0, 0.0);
            for (i, &y) in segment.iter().enumerate() {
                let dt = i as f64 - t_mean;
                sxy += dt * (y - y_mean);
                sxx += dt * dt;
            }
            let slope = sxy / sxx;
            for (i, v) in segment.iter_mut().enumerate() {
                *v -= y_mean + slope * (i as f64 - t_mean);
            }
        }
    }
}
/// Welch averaged-periodogram estimator for one channel at a time.
///
/// The FFT plan, taper and segment layout are built once and shared read-only,
/// so a single estimator can serve every channel of every epoch concurrently.
pub struct WelchEstimator {
    nperseg: usize,
    n_samples: usize,
    sfreq: f64,
    detrend: Detrend,
    window: Vec<f64>,
    starts: Vec<usize>,
    /// `sfreq * sum(w^2)`, turns |X|^2 into power per Hz.
    scale: f64,
    fft: Arc<dyn Fft<f64>>,
}
impl WelchEstimator {
    pub fn new(
        nfft: usize,
        n_samples: usize,
        sfreq: f64,
        detrend: Detrend,
    ) -> Result<Self, PsdError> {
        if !sfreq.is_finite() || sfreq <= 0.0 {
            return Err(PsdError::InvalidSampleRate);
        }
        let nperseg = nfft.min(n_samples);
        if nperseg == 0 {
            return Err(PsdError::InvalidNfft);
        }
        if nperseg < nfft {
            log::warn!(
                "NFFT ({nfft}) is longer than the signal ({n_samples} samples), using a single {nperseg}-sample window"
            );
        }
        let window = hann_window(nperseg);
        let scale = sfreq * window.iter().map(|w| w * w).sum::<f64>();
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(nperseg);
        Ok(Self {
            nperseg,
            n_samples,
            sfreq,
            detrend,
            window,
            starts: segment_starts(n_samples, nperseg),
            scale,
            fft,
        })
    }
    /// Effective window length after clamping to the signal length.
    pub fn nperseg(&self) -> usize {
        self.nperseg
    }
    pub fn n_windows(&self) -> usize {
        self.starts.len()
    }
    pub fn n_freqs(&self) -> usize {
        self.nperseg / 2 + 1
    }
    /// One-sided frequency axis, DC through Nyquist.
    pub fn frequencies(&self) -> Array1<f64> {
        let step = self.sfreq / self.nperseg as f64;
        Array1::from_shape_fn(self.n_freqs(), |k| k as f64 * step)
    }
    /// PSD of one channel. `channel` is only used to label errors.
    pub fn estimate(&self, signal: ArrayView1<'_, f64>, channel: usize) -> Result<Vec<f64>, PsdError> {
        if signal.len() != self.n_samples {
            return Err(PsdError::ShapeMismatch {
                context: "channel length",
                expected: self.n_samples,
                actual: signal.len(),
            });
        }
        if signal.iter().any(|v| !v.is_finite()) {
            return Err(PsdError::NonFiniteSamples { channel });
        }
        let n_freqs = self.n_freqs();
        let mut accum = vec![0.0; n_freqs];
        let mut segment = vec![0.0; self.nperseg];
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.nperseg];
        for &start in &self.starts {
            for (dst, &src) in segment
                .iter_mut()
                .zip(signal.iter().skip(start).take(self.nperseg))
            {
                *dst = src;
            }
            detrend_in_place(&mut segment, self.detrend);
            for ((dst, &x), &w) in buffer.iter_mut().zip(&segment).zip(&self.window) {
                *dst = Complex64::new(x * w, 0.0);
            }
            self.fft.process(&mut buffer);
            for (acc, c) in accum.iter_mut().zip(&buffer) {
                *acc += c.norm_sqr();
            }
        }
        let nyquist_bin = (self.nperseg % 2 == 0).then_some(self.nperseg / 2);
        let norm = self.scale * self.starts.len() as f64;
        for (k, value) in accum.iter_mut().enumerate() {
            let one_sided = if k == 0 || Some(k) == nyquist_bin { 1.0 } else { 2.0 };
            *value *= one_sided / norm;
        }
        Ok(accum)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    fn sine(freq: f64, sfreq: f64, n: usize, amplitude: f64) -> Array1<f64> {
        Array1::from_shape_fn(n, |i| amplitude * (2.0 * PI * freq * i as f64 / sfreq).sin())
    }
    #[test]
    fn frequency_axis_is_one_sided() {
        let welch = WelchEstimator::new(64, 1000, 250.0, Detrend::None).unwrap();
        let freqs = welch.frequencies();
        assert_eq!(freqs.len(), 33);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[32] - 125.0).abs() < 1e-12);
        assert!(freqs.iter().zip(freqs.iter().skip(1)).all(|(a, b)| b > a));
    }
    #[test]
    fn windows_overlap_by_half() {
        let welch = WelchEstimator::new(100, 1000, 100.0, Detrend::None).unwrap();
        // hop 50: starts 0, 50, ..., 900
        assert_eq!(welch.n_windows(), 19);
        let odd = WelchEstimator::new(5, 11, 100.0, Detrend::None).unwrap();
        // hop 3: starts 0, 3, 6
        assert_eq!(odd.n_windows(), 3);
    }
    #[test]
    fn short_signal_uses_a_single_window() {
        let welch = WelchEstimator::new(256, 100, 100.0, Detrend::None).unwrap();
        assert_eq!(welch.nperseg(), 100);
        assert_eq!(welch.n_windows(), 1);
        assert_eq!(welch.frequencies().len(), 51);
        let psd = welch.estimate(sine(10.0, 100.0, 100, 1.0).view(), 0).unwrap();
        assert_eq!(psd.len(), 51);
    }
    #[test]
    fn sine_peak_lands_on_its_bin() {
        let sfreq = 256.0;
        let welch = WelchEstimator::new(128, 2048, sfreq, Detrend::None).unwrap();
        let psd = welch.estimate(sine(32.0, sfreq, 2048, 3.0).view(), 0).unwrap();
        let peak = psd
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert!((welch.frequencies()[peak] - 32.0).abs() < 1e-9);
    }
    #[test]
    fn white_noise_density_matches_variance() {
        // integrating a density-scaled PSD recovers the signal variance
        let sfreq = 500.0;
        let n = 50_000;
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Array1::from_shape_fn(n, |_| rng.gen_range(-1.0f64..1.0));
        let welch = WelchEstimator::new(256, n, sfreq, Detrend::None).unwrap();
        let psd = welch.estimate(noise.view(), 0).unwrap();
        let df = sfreq / 256.0;
        let power: f64 = psd.iter().sum::<f64>() * df;
        // uniform(-1, 1) has variance 1/3
        assert!((power - 1.0 / 3.0).abs() < 0.02, "power = {power}");
        assert!(psd.iter().all(|&p| p >= 0.0));
    }
    #[test]
    fn detrend_removes_offset_and_slope() {
        let sfreq = 100.0;
        let ramp = Array1::from_shape_fn(400, |i| 5.0 + 0.01 * i as f64);
        let mean = WelchEstimator::new(64, 400, sfreq, Detrend::Mean).unwrap();
        let raw = WelchEstimator::new(64, 400, sfreq, Detrend::None).unwrap();
        let linear = WelchEstimator::new(64, 400, sfreq, Detrend::Linear).unwrap();
        let dc_raw = raw.estimate(ramp.view(), 0).unwrap()[0];
        let dc_mean = mean.estimate(ramp.view(), 0).unwrap()[0];
        assert!(dc_mean < dc_raw * 1e-3);
        let residual = linear.estimate(ramp.view(), 0).unwrap();
        assert!(residual.iter().all(|&p| p < 1e-20));
    }
    #[test]
    fn estimate_is_deterministic() {
        let welch = WelchEstimator::new(124, 6000, 600.615, Detrend::None).unwrap();
        let signal = sine(11.0, 600.615, 6000, 1e-12);
        let a = welch.estimate(signal.view(), 0).unwrap();
        let b = welch.estimate(signal.view(), 0).unwrap();
        assert_eq!(a, b);
    }
    #[test]
    fn rejects_non_finite_samples_and_bad_arguments() {
        let welch = WelchEstimator::new(8, 16, 100.0, Detrend::None).unwrap();
        let mut signal = Array1::zeros(16);
        signal[5] = f64::NAN;
        assert!(matches!(
            welch.estimate(signal.view(), 4),
            Err(PsdError::NonFiniteSamples { channel: 4 })
        ));
        assert!(matches!(
            welch.estimate(Array1::<f64>::zeros(15).view(), 0),
            Err(PsdError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            WelchEstimator::new(0, 16, 100.0, Detrend::None),
            Err(PsdError::InvalidNfft)
        ));
        assert!(matches!(
            WelchEstimator::new(8, 16, -1.0, Detrend::None),
            Err(PsdError::InvalidSampleRate)
        ));
    }
}
