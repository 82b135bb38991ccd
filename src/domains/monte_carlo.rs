//! Stochastic path simulation.
//!
//! Each trajectory is a Gaussian random walk anchored at a base value:
//! `horizon` zero-mean normal steps with standard deviation `volatility`,
//! cumulatively summed and shifted by `base`.
//!
//! Trajectories are independent, so large runs can be spread over a
//! work-stealing pool. The parallel path partitions one PCG stream per
//! trajectory from a single seed drawn from the injected source, which
//! makes its output independent of the worker count.

use crossbeam_deque::{Injector, Steal, Stealer, Worker};

use crate::engine::rng::{RandomSource, SimRng};
use crate::error::{ClimError, ClimResult};

/// One simulated future path, one value per year of the horizon.
pub type Trajectory = Vec<f64>;

/// Default simulation horizon in years.
pub const DEFAULT_HORIZON_YEARS: usize = 30;

/// Generator of random-walk trajectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StochasticPathSimulator {
    horizon_years: usize,
    workers: usize,
}

impl Default for StochasticPathSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZON_YEARS)
    }
}

impl StochasticPathSimulator {
    /// Create a sequential simulator with the given horizon.
    #[must_use]
    pub const fn new(horizon_years: usize) -> Self {
        Self {
            horizon_years,
            workers: 1,
        }
    }

    /// Spread trajectories over `workers` threads (values <= 1 run inline).
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Horizon length in years.
    #[must_use]
    pub const fn horizon_years(&self) -> usize {
        self.horizon_years
    }

    /// Configured worker count.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Simulate `count` trajectories around `base`.
    ///
    /// With zero volatility every trajectory equals `[base; horizon]`.
    ///
    /// # Errors
    ///
    /// - [`ClimError::Config`] if `count` is zero or `volatility` is negative.
    /// - [`ClimError::NonFiniteValue`] if `base` or `volatility` is not finite.
    pub fn simulate<R>(
        &self,
        count: usize,
        base: f64,
        volatility: f64,
        rng: &mut R,
    ) -> ClimResult<Vec<Trajectory>>
    where
        R: RandomSource + ?Sized,
    {
        validate_inputs(count, base, volatility)?;

        if self.workers > 1 {
            return Ok(self.simulate_parallel(count, base, volatility, rng));
        }

        Ok((0..count)
            .map(|_| random_walk(base, volatility, self.horizon_years, rng))
            .collect())
    }

    fn simulate_parallel<R>(
        &self,
        count: usize,
        base: f64,
        volatility: f64,
        rng: &mut R,
    ) -> Vec<Trajectory>
    where
        R: RandomSource + ?Sized,
    {
        let master_seed = rng.next_u64();
        let streams = SimRng::new(master_seed).partition(count);
        let horizon = self.horizon_years;
        tracing::debug!(count, workers = self.workers, master_seed, "parallel path simulation");

        execute_work_stealing(self.workers, count, |index| {
            let mut stream = streams[index].clone();
            random_walk(base, volatility, horizon, &mut stream)
        })
    }
}

fn validate_inputs(count: usize, base: f64, volatility: f64) -> ClimResult<()> {
    if count == 0 {
        return Err(ClimError::config("trajectory count must be at least 1"));
    }
    if !base.is_finite() {
        return Err(ClimError::non_finite("simulation base"));
    }
    if !volatility.is_finite() {
        return Err(ClimError::non_finite("simulation volatility"));
    }
    if volatility < 0.0 {
        return Err(ClimError::config(format!(
            "volatility must be non-negative, got {volatility}"
        )));
    }
    Ok(())
}

/// One Gaussian random walk of `horizon` steps anchored at `base`.
fn random_walk<R>(base: f64, volatility: f64, horizon: usize, rng: &mut R) -> Trajectory
where
    R: RandomSource + ?Sized,
{
    let mut cumulative = 0.0;
    (0..horizon)
        .map(|_| {
            cumulative += rng.normal(0.0, volatility);
            base + cumulative
        })
        .collect()
}

/// Run `n_tasks` indexed tasks on a work-stealing pool.
///
/// Idle workers steal from the global queue first, then from their
/// neighbours round-robin. Each worker keeps its own results, which are
/// merged in task-index order. A panicking task is re-raised on the
/// calling thread.
fn execute_work_stealing<F, T>(num_workers: usize, n_tasks: usize, task: F) -> Vec<T>
where
    F: Fn(usize) -> T + Sync,
    T: Send,
{
    let injector: Injector<usize> = Injector::new();
    let workers: Vec<Worker<usize>> = (0..num_workers).map(|_| Worker::new_fifo()).collect();
    let stealers: Vec<Stealer<usize>> = workers.iter().map(Worker::stealer).collect();

    for index in 0..n_tasks {
        injector.push(index);
    }

    let mut indexed: Vec<(usize, T)> = Vec::with_capacity(n_tasks);

    std::thread::scope(|s| {
        let handles: Vec<_> = workers
            .into_iter()
            .enumerate()
            .map(|(worker_id, worker)| {
                let injector = &injector;
                let stealers = &stealers;
                let task = &task;

                s.spawn(move || {
                    let mut local = Vec::new();
                    while let Some(index) = next_task(worker_id, &worker, injector, stealers) {
                        local.push((index, task(index)));
                    }
                    local
                })
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(local) => indexed.extend(local),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
    });

    indexed.sort_unstable_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, output)| output).collect()
}

fn next_task(
    worker_id: usize,
    local: &Worker<usize>,
    injector: &Injector<usize>,
    stealers: &[Stealer<usize>],
) -> Option<usize> {
    if let Some(index) = local.pop() {
        return Some(index);
    }

    loop {
        match injector.steal_batch_and_pop(local) {
            Steal::Success(index) => return Some(index),
            Steal::Empty => break,
            Steal::Retry => {}
        }
    }

    for offset in 1..=stealers.len() {
        let victim = &stealers[(worker_id + offset) % stealers.len()];
        loop {
            match victim.steal() {
                Steal::Success(index) => return Some(index),
                Steal::Empty => break,
                Steal::Retry => {}
            }
        }
    }

    None
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_zero_volatility_flat(
            n in 1usize..50,
            base in -100.0f64..100.0,
            horizon in 0usize..40,
            seed in 0u64..u64::MAX,
        ) {
            let sim = StochasticPathSimulator::new(horizon);
            let paths = sim.simulate(n, base, 0.0, &mut SimRng::new(seed)).unwrap();

            prop_assert_eq!(paths.len(), n);
            for path in &paths {
                prop_assert_eq!(path, &vec![base; horizon]);
            }
        }
    }
}
