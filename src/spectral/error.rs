use thiserror::Error;
#[derive(Debug, Error)]
pub enum PsdError {
    #[error("sample rate must be finite and greater than zero")]
    InvalidSampleRate,
    #[error("sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: f64, actual: f64 },
    #[error("invalid channel selection: {0}")]
    InvalidSelection(String),
    #[error("invalid {what} range: [{low}, {high}]")]
    InvalidRange {
        what: &'static str,
        low: f64,
        high: f64,
    },
    #[error("{context} shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("no frequency bins in [{fmin}, {fmax}] Hz (nyquist is {nyquist} Hz)")]
    EmptyBand { fmin: f64, fmax: f64, nyquist: f64 },
    #[error("NFFT must be greater than zero")]
    InvalidNfft,
    #[error("channel {channel} contains non-finite samples")]
    NonFiniteSamples { channel: usize },
    #[error("failed to start worker pool: {0}")]
    WorkerPool(String),
}
impl From<rayon::ThreadPoolBuildError> for PsdError {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        PsdError::WorkerPool(value.to_string())
    }
}
