use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use crate::spectral::PsdError;
/// Runs per-channel work on a fixed number of workers.
///
/// `n_jobs == 1` stays on the calling thread. Anything else gets a dedicated
/// rayon pool (`0` lets rayon pick one thread per core). Channels are split into
/// contiguous chunks, one per worker, and the results are concatenated back in
/// input order.
pub struct Dispatcher {
    pool: Option<ThreadPool>,
}
impl Dispatcher {
    pub fn new(n_jobs: usize) -> Result<Self, PsdError> {
        if n_jobs == 1 {
            return Ok(Self { pool: None });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_jobs)
            .thread_name(|i| format!("psd-worker-{i}"))
            .build()?;
        log::debug!("started {} PSD workers", pool.current_num_threads());
        Ok(Self { pool: Some(pool) })
    }
    pub fn n_workers(&self) -> usize {
        self.pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
            .unwrap_or(1)
    }
    /// Apply `work` to every channel. The first failure stops the remaining
    /// chunks and is returned.
    pub fn dispatch<T, F>(&self, channels: &[usize], work: F) -> Result<Vec<T>, PsdError>
    where
        T: Send,
        F: Fn(usize) -> Result<T, PsdError> + Sync,
    {
        let Some(pool) = &self.pool else {
            return channels.iter().map(|&ch| work(ch)).collect();
        };
        if channels.is_empty() {
            return Ok(Vec::new());
        }
        let chunk_len = channels.len().div_ceil(pool.current_num_threads());
        let chunks: Vec<Vec<T>> = pool.install(|| {
            channels
                .par_chunks(chunk_len)
                .map(|chunk| chunk.iter().map(|&ch| work(ch)).collect::<Result<Vec<T>, _>>())
                .collect::<Result<Vec<Vec<T>>, PsdError>>()
        })?;
        Ok(chunks.into_iter().flatten().collect())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    #[test]
    fn parallel_results_keep_channel_order() {
        let channels: Vec<usize> = (0..23).rev().collect();
        for n_jobs in [1, 2, 3, 8] {
            let dispatcher = Dispatcher::new(n_jobs).unwrap();
            let out = dispatcher
                .dispatch(&channels, |ch| Ok::<_, PsdError>(ch * 10))
                .unwrap();
            let expected: Vec<usize> = channels.iter().map(|ch| ch * 10).collect();
            assert_eq!(out, expected, "n_jobs = {n_jobs}");
        }
    }
    #[test]
    fn sequential_runs_on_caller_thread() {
        let dispatcher = Dispatcher::new(1).unwrap();
        assert_eq!(dispatcher.n_workers(), 1);
        let caller = std::thread::current().id();
        let ids = dispatcher
            .dispatch(&[0, 1, 2], |_| Ok(std::thread::current().id()))
            .unwrap();
        assert!(ids.iter().all(|id| *id == caller));
    }
    #[test]
    fn worker_error_is_surfaced() {
        let dispatcher = Dispatcher::new(4).unwrap();
        assert_eq!(dispatcher.n_workers(), 4);
        let calls = AtomicUsize::new(0);
        let channels: Vec<usize> = (0..16).collect();
        let result = dispatcher.dispatch(&channels, |ch| {
            calls.fetch_add(1, Ordering::SeqCst);
            if ch == 5 {
                Err(PsdError::NonFiniteSamples { channel: ch })
            } else {
                Ok(ch)
            }
        });
        assert!(matches!(result, Err(PsdError::NonFiniteSamples { channel: 5 })));
        assert!(calls.load(Ordering::SeqCst) <= channels.len());
    }
    #[test]
    fn all_cores_and_empty_input() {
        let dispatcher = Dispatcher::new(0).unwrap();
        assert!(dispatcher.n_workers() >= 1);
        let out: Vec<usize> = dispatcher.dispatch(&[], |ch| Ok(ch)).unwrap();
        assert!(out.is_empty());
    }
}
