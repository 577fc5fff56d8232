use super::search::{LocalSearch, MoveCandidate};
use crate::matrix::Distance;

const MIN_RELOCATE_NODES: usize = 3;

impl LocalSearch<'_> {
    /// Evaluates every single-node relocation and applies the best improving
    /// one: `edge_1_end` is pulled out from behind `edge_1_start` and
    /// reinserted after `edge_2_start`, replacing the edges
    /// `(edge_1_start, edge_1_end)`, `(edge_1_end, next)` and
    /// `(edge_2_start, edge_2_end)` with `(edge_1_start, next)`,
    /// `(edge_2_start, edge_1_end)` and `(edge_1_end, edge_2_end)`.
    ///
    /// Returns the gain, or 0 when no relocation improves the tour.
    pub fn relocate_step(&mut self) -> Distance {
        if self.graph.n() < MIN_RELOCATE_NODES {
            return 0;
        }

        let graph = &self.graph;
        let matrix = self.matrix;

        let best = self.best_over_ranges(graph.relocate_limits(), |start, end| {
            let mut best = MoveCandidate::default();
            for edge_1_start in start..end {
                let edge_1_end = graph.next(edge_1_start);
                let next = graph.next(edge_1_end);

                // Weights that do not depend on the insertion edge.
                let first_potential_add = matrix.dist(edge_1_start, next);
                let edge_1_weight = matrix.dist(edge_1_start, edge_1_end);
                let edge_1_end_next_weight = matrix.dist(edge_1_end, next);

                // Walk the rest of the cycle for the insertion edge; stopping
                // at edge_1_start keeps the moved node out of the candidates.
                let mut edge_2_start = next;
                while edge_2_start != edge_1_start {
                    let edge_2_end = graph.next(edge_2_start);
                    let before_cost = edge_1_weight
                        + edge_1_end_next_weight
                        + matrix.dist(edge_2_start, edge_2_end);
                    let after_cost = first_potential_add
                        + matrix.dist(edge_2_start, edge_1_end)
                        + matrix.dist(edge_1_end, edge_2_end);
                    if before_cost > after_cost {
                        best.consider(before_cost - after_cost, edge_1_start, edge_2_start);
                    }
                    edge_2_start = edge_2_end;
                }
            }
            best
        });

        if best.gain > 0 {
            // Snapshot the successors involved before the first write.
            let edge_1_end = self.graph.next(best.edge_1_start);
            let next = self.graph.next(edge_1_end);
            let edge_2_end = self.graph.next(best.edge_2_start);

            self.graph.set_next(best.edge_1_start, next);
            self.graph.set_next(edge_1_end, edge_2_end);
            self.graph.set_next(best.edge_2_start, edge_1_end);
        }
        best.gain
    }

    /// Repeats `relocate_step` until it stops improving; returns the summed gain.
    pub fn perform_all_relocate_steps(&mut self) -> Distance {
        let mut total_gain = 0;
        let mut steps = 0u32;
        loop {
            let gain = self.relocate_step();
            if gain == 0 {
                break;
            }
            total_gain += gain;
            steps += 1;
        }
        if total_gain > 0 {
            log::trace!("search.relocate: steps={steps} gain={total_gain}");
        }
        total_gain
    }
}
