// src/main.rs
// 演示程序：合成一段多通道信号，分别计算连续数据和分段数据的功率谱
use std::f64::consts::PI;
use anyhow::{Context, Result};
use ndarray::{s, Array2, Array3};
use neuropsd::{
    compute_epochs_psd, compute_raw_psd, Epochs, Projector, PsdConfig, PsdResult, SignalSegment,
    TimeWindow,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
/// Demo settings, read from an optional JSON file given as the first argument.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    sfreq: f64,
    n_channels: usize,
    duration_seconds: f64,
    epoch_seconds: f64,
    seed: u64,
    window: TimeWindow,
    psd: PsdConfig,
}
impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sfreq: 600.615,
            n_channels: 4,
            duration_seconds: 20.0,
            epoch_seconds: 2.0,
            seed: 42,
            window: TimeWindow::new(0.0, Some(10.0)),
            psd: PsdConfig {
                fmin: 2.0,
                fmax: 70.0,
                nfft: 256,
                ..PsdConfig::default()
            },
        }
    }
}
fn load_config() -> Result<DemoConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}
// 每个通道一个正弦 (8 Hz, 16 Hz, ...) 加上均匀噪声
fn synthesize(config: &DemoConfig) -> Array2<f64> {
    let n_samples = (config.duration_seconds * config.sfreq).round() as usize;
    let mut rng = StdRng::seed_from_u64(config.seed);
    Array2::from_shape_fn((config.n_channels, n_samples), |(c, t)| {
        let freq = 8.0 * (c + 1) as f64;
        (2.0 * PI * freq * t as f64 / config.sfreq).sin() + 0.2 * rng.gen_range(-1.0f64..1.0)
    })
}
fn log_peaks(label: &str, result: &PsdResult) {
    for (row_index, row) in result.psds.rows().into_iter().enumerate() {
        let peak = row
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| result.freqs[k]);
        if let Some(peak) = peak {
            log::info!("{label} row {row_index}: peak at {peak:.2} Hz");
        }
    }
}
fn main() -> Result<()> {
    env_logger::init();
    let config = load_config()?;
    let data = synthesize(&config);
    let raw = SignalSegment::new(data, config.sfreq)?;
    let projector = Projector::identity(raw.n_channels());
    let result = compute_raw_psd(&raw, &config.window, Some(&projector), &config.psd)
        .context("continuous PSD failed")?;
    log::info!(
        "continuous PSD: {} channels x {} bins",
        result.n_channels(),
        result.n_freqs()
    );
    log_peaks("raw", &result);
    let epoch_len = (config.epoch_seconds * config.sfreq).round() as usize;
    let n_epochs = if epoch_len == 0 {
        0
    } else {
        raw.n_samples() / epoch_len
    };
    let mut stacked = Array3::zeros((n_epochs, raw.n_channels(), epoch_len));
    for (e, mut epoch) in stacked.outer_iter_mut().enumerate() {
        let start = e * epoch_len;
        epoch.assign(&raw.data().slice(s![.., start..start + epoch_len]));
    }
    let epochs = Epochs::new(stacked, config.sfreq)?;
    let psds = compute_epochs_psd(&epochs, Some(&projector), &config.psd)
        .context("epoch PSD setup failed")?;
    for (index, item) in psds.enumerate() {
        let result = item.with_context(|| format!("epoch {index}"))?;
        log_peaks(&format!("epoch {index}"), &result);
    }
    Ok(())
}
