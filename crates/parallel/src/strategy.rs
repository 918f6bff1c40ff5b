//! Parallel processing strategies

use rayon::prelude::*;
use texgis_core::{Error, Result};

/// Processing mode for algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Everything, including the per-pixel loops of the filters, on one thread
    Sequential,
    /// Parallel processing on rayon's global pool
    #[default]
    Parallel,
    /// Parallel with specified number of threads
    ParallelWith(usize),
}

impl ProcessingMode {
    /// Number of workers this mode runs on
    pub fn workers(&self) -> usize {
        match self {
            ProcessingMode::Sequential => 1,
            ProcessingMode::Parallel => num_cpus(),
            ProcessingMode::ParallelWith(threads) => (*threads).max(1),
        }
    }

    /// Build the thread pool this mode runs on.
    ///
    /// Build it once per job: every rayon call made inside
    /// [`Executor::install`], including nested ones, stays on that pool.
    pub fn executor(&self) -> Result<Executor> {
        let threads = match self {
            ProcessingMode::Parallel => return Ok(Executor { pool: None }),
            ProcessingMode::Sequential => 1,
            ProcessingMode::ParallelWith(threads) => (*threads).max(1),
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::Other(format!("Failed to build thread pool: {}", e)))?;
        Ok(Executor { pool: Some(pool) })
    }
}

/// Thread pool built from a [`ProcessingMode`]; `None` is rayon's global pool
#[derive(Debug)]
pub struct Executor {
    pool: Option<rayon::ThreadPool>,
}

impl Executor {
    /// Run `op` on this executor's pool
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        R: Send,
        OP: FnOnce() -> R + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Threads available to work run through [`install`](Self::install)
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => num_cpus(),
        }
    }
}

/// Strategy for parallel execution
pub trait ParallelStrategy {
    /// Map a function over indices and collect results in index order
    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;
}

impl ParallelStrategy for Executor {
    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        Ok(self.install(|| range.into_par_iter().map(f).collect()))
    }
}

impl ParallelStrategy for ProcessingMode {
    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        self.executor()?.par_map(range, f)
    }
}

/// Get the number of available CPU cores
pub fn num_cpus() -> usize {
    rayon::current_num_threads()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_modes_agree() {
        let expected: Vec<usize> = (0..100).map(|i| i * i).collect();
        for mode in [
            ProcessingMode::Sequential,
            ProcessingMode::Parallel,
            ProcessingMode::ParallelWith(3),
        ] {
            assert_eq!(mode.par_map(0..100, |i| i * i).unwrap(), expected);
        }
    }

    #[test]
    fn test_workers() {
        assert_eq!(ProcessingMode::Sequential.workers(), 1);
        assert_eq!(ProcessingMode::ParallelWith(0).workers(), 1);
        assert_eq!(ProcessingMode::ParallelWith(4).workers(), 4);
        assert!(ProcessingMode::Parallel.workers() >= 1);
    }

    #[test]
    fn test_executor_threads() {
        assert_eq!(ProcessingMode::Sequential.executor().unwrap().threads(), 1);
        assert_eq!(ProcessingMode::ParallelWith(3).executor().unwrap().threads(), 3);
    }

    #[test]
    fn test_sequential_nested_work_stays_on_one_thread() {
        let executor = ProcessingMode::Sequential.executor().unwrap();
        let seen = Mutex::new(HashSet::new());

        executor
            .par_map(0..8, |_| {
                (0..64).into_par_iter().for_each(|_| {
                    seen.lock().unwrap().insert(thread::current().id());
                });
            })
            .unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
