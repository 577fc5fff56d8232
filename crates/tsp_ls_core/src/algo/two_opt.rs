use super::search::{LocalSearch, MoveCandidate};
use crate::matrix::Distance;

const MIN_TWO_OPT_NODES: usize = 4;

impl LocalSearch<'_> {
    /// Evaluates every 2-opt exchange and applies the best improving one:
    /// edges `edge_1_start -> edge_1_end` and `edge_2_start -> edge_2_end`
    /// are replaced by `edge_1_start -> edge_2_start` and
    /// `edge_1_end -> edge_2_end`, reversing the sub-path in between.
    ///
    /// Returns the gain, or 0 when no exchange improves the tour.
    pub fn two_opt_step(&mut self) -> Distance {
        let n = self.graph.n();
        if n < MIN_TWO_OPT_NODES {
            return 0;
        }

        let graph = &self.graph;
        let matrix = self.matrix;

        // The cost table is symmetric, so the pair (edge_2, edge_1) scores
        // the same as (edge_1, edge_2); enforcing edge_1_start < edge_2_start
        // visits each unordered pair once.
        let best = self.best_over_ranges(graph.two_opt_limits(), |start, end| {
            let mut best = MoveCandidate::default();
            for edge_1_start in start..end {
                let edge_1_end = graph.next(edge_1_start);
                for edge_2_start in (edge_1_start + 1)..n {
                    let edge_2_end = graph.next(edge_2_start);
                    if edge_2_start == edge_1_end || edge_2_end == edge_1_start {
                        // Adjacent edges, nothing to exchange.
                        continue;
                    }

                    let before_cost = matrix.dist(edge_1_start, edge_1_end)
                        + matrix.dist(edge_2_start, edge_2_end);
                    let after_cost = matrix.dist(edge_1_start, edge_2_start)
                        + matrix.dist(edge_1_end, edge_2_end);
                    if before_cost > after_cost {
                        best.consider(before_cost - after_cost, edge_1_start, edge_2_start);
                    }
                }
            }
            best
        });

        if best.gain > 0 {
            self.apply_two_opt(&best);
        }
        best.gain
    }

    fn apply_two_opt(&mut self, best: &MoveCandidate) {
        let edge_1_end = self.graph.next(best.edge_1_start);
        let edge_2_end = self.graph.next(best.edge_2_start);

        // Sub-path from edge_1_end up to (excluding) edge_2_start, in tour order.
        let mut to_reverse = Vec::new();
        let mut current = edge_1_end;
        while current != best.edge_2_start {
            to_reverse.push(current);
            current = self.graph.next(current);
        }

        let mut current = best.edge_2_start;
        self.graph.set_next(best.edge_1_start, current);
        for &node in to_reverse.iter().rev() {
            self.graph.set_next(current, node);
            current = node;
        }
        self.graph.set_next(current, edge_2_end);
    }

    /// Repeats `two_opt_step` until it stops improving; returns the summed gain.
    pub fn perform_all_two_opt_steps(&mut self) -> Distance {
        let mut total_gain = 0;
        let mut steps = 0u32;
        loop {
            let gain = self.two_opt_step();
            if gain == 0 {
                break;
            }
            total_gain += gain;
            steps += 1;
        }
        if total_gain > 0 {
            log::trace!("search.two_opt: steps={steps} gain={total_gain}");
        }
        total_gain
    }
}
