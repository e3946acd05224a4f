//! Welch power spectral density estimation for multichannel EEG/MEG data.
//!
//! Continuous recordings go through [`compute_raw_psd`], fixed-length epochs
//! through [`compute_epochs_psd`], which yields one [`PsdResult`] per epoch on
//! demand. Both optionally apply a [`Projector`] across the full channel set
//! and spread the per-channel FFT work over `n_jobs` workers.
pub mod spectral;
pub use spectral::{
    apply_projection, band_indices, compute_epochs_psd, compute_raw_psd, select_band, Detrend,
    Dispatcher, EpochPsdIter, Epochs, Projector, PsdConfig, PsdError, PsdResult, SignalSegment,
    TimeWindow, WelchEstimator,
};
