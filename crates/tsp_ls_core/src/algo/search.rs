use rayon::prelude::*;

use crate::{
    Error, Result,
    matrix::{Distance, DistanceMatrix},
    tour::TourGraph,
};

/// Best move found by one worker while scanning its range. Reset per step.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct MoveCandidate {
    pub(super) gain: Distance,
    pub(super) edge_1_start: usize,
    pub(super) edge_2_start: usize,
}

impl MoveCandidate {
    /// Keeps the first candidate reaching the current best gain: only a
    /// strictly greater gain overwrites.
    pub(super) fn consider(&mut self, gain: Distance, edge_1_start: usize, edge_2_start: usize) {
        if gain > self.gain {
            self.gain = gain;
            self.edge_1_start = edge_1_start;
            self.edge_2_start = edge_2_start;
        }
    }
}

/// Steepest-descent local search over one tour.
///
/// Holds the successor-array tour and a worker pool sized to the effective
/// thread count. Each operator step scans its candidate ranges in parallel,
/// picks the single best improving move, and applies it on the calling
/// thread; the successor array is never written while workers are scanning.
#[derive(Debug)]
pub struct LocalSearch<'a> {
    pub(super) matrix: &'a DistanceMatrix,
    pub(super) graph: TourGraph,
    pool: rayon::ThreadPool,
}

impl<'a> LocalSearch<'a> {
    pub fn new(
        matrix: &'a DistanceMatrix,
        order: &[usize],
        requested_threads: usize,
    ) -> Result<Self> {
        if order.len() != matrix.n() {
            return Err(Error::input(format!(
                "tour length {} does not match cost table size {}",
                order.len(),
                matrix.n()
            )));
        }

        let graph = TourGraph::new(order, requested_threads)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(graph.threads())
            .build()
            .map_err(|e| Error::setup(format!("worker pool: {e}")))?;

        Ok(Self {
            matrix,
            graph,
            pool,
        })
    }

    pub fn n(&self) -> usize {
        self.graph.n()
    }

    pub fn threads(&self) -> usize {
        self.graph.threads()
    }

    pub fn cost(&self) -> Distance {
        self.graph.cost(self.matrix)
    }

    /// The current cycle as an ordered sequence beginning at `start`.
    pub fn tour(&self, start: usize) -> Result<Vec<usize>> {
        self.graph.tour(start)
    }

    /// Runs every worker range through `look_up` and reduces to the global
    /// best candidate. Candidates come back in range order and the fold
    /// only replaces on strictly greater gain, so the leftmost worker wins
    /// ties regardless of scheduling.
    pub(super) fn best_over_ranges<F>(&self, limits: &[usize], look_up: F) -> MoveCandidate
    where
        F: Fn(usize, usize) -> MoveCandidate + Sync,
    {
        let candidates: Vec<MoveCandidate> = self.pool.install(|| {
            limits
                .par_windows(2)
                .map(|range| look_up(range[0], range[1]))
                .collect()
        });

        let mut best = MoveCandidate::default();
        for candidate in candidates {
            best.consider(candidate.gain, candidate.edge_1_start, candidate.edge_2_start);
        }
        best
    }

    /// Runs operators to a fixed point: a full 2-opt descent, then a full
    /// relocate descent, then a full or-opt descent, repeated while any of
    /// the three still improves. Returns the total gain.
    pub fn solve(&mut self) -> Distance {
        let mut total_gain = 0;
        let mut rounds = 0u32;

        loop {
            let two_opt_gain = self.perform_all_two_opt_steps();
            let relocate_gain = self.perform_all_relocate_steps();
            let or_opt_gain = self.perform_all_or_opt_steps();

            let round_gain = two_opt_gain + relocate_gain + or_opt_gain;
            rounds += 1;
            if round_gain == 0 {
                break;
            }
            total_gain += round_gain;
            log::debug!("search.round: done round={rounds} gain={round_gain}");
        }

        log::debug!("search: fixed point rounds={rounds} gain={total_gain}");
        total_gain
    }
}
