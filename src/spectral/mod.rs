// src/spectral/mod.rs
// Welch 功率谱估计：连续数据与分段 (epochs) 共用同一条计算管线
pub mod band;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod projection;
pub mod segment;
pub mod welch;
// 公开导出常用类型，方便外部调用
pub use band::{band_indices, select_band};
pub use config::{Detrend, PsdConfig, TimeWindow};
pub use dispatch::Dispatcher;
pub use error::PsdError;
pub use pipeline::{compute_epochs_psd, compute_raw_psd, EpochPsdIter, PsdResult};
pub use projection::{apply_projection, Projector};
pub use segment::{Epochs, SignalSegment};
pub use welch::WelchEstimator;
