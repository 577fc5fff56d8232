use super::search::{LocalSearch, MoveCandidate};
use crate::matrix::Distance;

const MIN_OR_OPT_NODES: usize = 4;

impl LocalSearch<'_> {
    /// Evaluates every relocation of a pair of consecutive nodes and applies
    /// the best improving one: the block `edge_1_end -> next` is pulled out
    /// from behind `edge_1_start` and reinserted, same orientation, after
    /// `edge_2_start`. The edge inside the block is untouched.
    ///
    /// Returns the gain, or 0 when no block move improves the tour.
    pub fn or_opt_step(&mut self) -> Distance {
        if self.graph.n() < MIN_OR_OPT_NODES {
            return 0;
        }

        let graph = &self.graph;
        let matrix = self.matrix;

        let best = self.best_over_ranges(graph.relocate_limits(), |start, end| {
            let mut best = MoveCandidate::default();
            for edge_1_start in start..end {
                let edge_1_end = graph.next(edge_1_start);
                let next = graph.next(edge_1_end);
                let next_2 = graph.next(next);

                // Weights that do not depend on the insertion edge.
                let first_potential_add = matrix.dist(edge_1_start, next_2);
                let edge_1_weight = matrix.dist(edge_1_start, edge_1_end);
                let next_next_2_weight = matrix.dist(next, next_2);

                // Starting past the block keeps both moved nodes out of the
                // insertion candidates.
                let mut edge_2_start = next_2;
                while edge_2_start != edge_1_start {
                    let edge_2_end = graph.next(edge_2_start);
                    let before_cost = edge_1_weight
                        + next_next_2_weight
                        + matrix.dist(edge_2_start, edge_2_end);
                    let after_cost = first_potential_add
                        + matrix.dist(edge_2_start, edge_1_end)
                        + matrix.dist(next, edge_2_end);
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
            let next_2 = self.graph.next(next);
            let edge_2_end = self.graph.next(best.edge_2_start);

            self.graph.set_next(best.edge_1_start, next_2);
            self.graph.set_next(next, edge_2_end);
            self.graph.set_next(best.edge_2_start, edge_1_end);
        }
        best.gain
    }

    /// Repeats `or_opt_step` until it stops improving; returns the summed gain.
    pub fn perform_all_or_opt_steps(&mut self) -> Distance {
        let mut total_gain = 0;
        let mut steps = 0u32;
        loop {
            let gain = self.or_opt_step();
            if gain == 0 {
                break;
            }
            total_gain += gain;
            steps += 1;
        }
        if total_gain > 0 {
            log::trace!("search.or_opt: steps={steps} gain={total_gain}");
        }
        total_gain
    }
}

#[cfg(test)]
mod tests {
    use crate::{algo::LocalSearch, matrix::DistanceMatrix, node::Node};

    /// Six collinear points; the seed tour carries the block (3, 1) in the
    /// wrong slot.
    fn misplaced_block_line() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Node::new(0.0, 0.0),
            Node::new(10.0, 0.0),
            Node::new(20.0, 0.0),
            Node::new(30.0, 0.0),
            Node::new(40.0, 0.0),
            Node::new(50.0, 0.0),
        ])
    }

    #[test]
    fn moves_a_misplaced_block_to_the_optimum_in_one_step() {
        let matrix = misplaced_block_line();
        let mut search = LocalSearch::new(&matrix, &[0, 3, 1, 2, 4, 5], 1).expect("valid input");
        assert_eq!(search.cost(), 140);

        let gain = search.or_opt_step();

        // The line's optimal round trip is twice its span.
        assert_eq!(gain, 40);
        assert_eq!(search.cost(), 100);
        assert_eq!(search.or_opt_step(), 0);
    }

    #[test]
    fn block_orientation_is_preserved() {
        let matrix = misplaced_block_line();
        let mut search = LocalSearch::new(&matrix, &[0, 3, 1, 2, 4, 5], 1).expect("valid input");
        search.or_opt_step();

        // The block (3, 1) is reinserted between 5 and 0 without flipping.
        assert_eq!(
            search.tour(0).expect("start in range"),
            vec![0, 2, 4, 5, 3, 1]
        );
    }

    #[test]
    fn step_gain_equals_the_cost_delta() {
        let matrix = misplaced_block_line();
        let mut search = LocalSearch::new(&matrix, &[0, 3, 1, 2, 4, 5], 3).expect("valid input");

        let before = search.cost();
        let gain = search.or_opt_step();

        assert!(gain > 0);
        assert_eq!(search.cost(), before - gain);
    }

    #[test]
    fn keeps_a_single_cycle_after_the_move() {
        let matrix = misplaced_block_line();
        let mut search = LocalSearch::new(&matrix, &[0, 3, 1, 2, 4, 5], 1).expect("valid input");
        search.or_opt_step();

        let mut order = search.tour(0).expect("start in range");
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn refuses_cycles_below_four_nodes() {
        let matrix = DistanceMatrix::from_points(&[
            Node::new(0.0, 0.0),
            Node::new(10.0, 0.0),
            Node::new(0.0, 10.0),
        ]);
        let mut search = LocalSearch::new(&matrix, &[0, 1, 2], 1).expect("valid input");

        assert_eq!(search.or_opt_step(), 0);
        assert_eq!(search.perform_all_or_opt_steps(), 0);
    }

    #[test]
    fn perform_all_accumulates_until_settled() {
        let matrix = misplaced_block_line();
        let mut search = LocalSearch::new(&matrix, &[0, 3, 1, 2, 4, 5], 2).expect("valid input");

        let before = search.cost();
        let total_gain = search.perform_all_or_opt_steps();

        assert!(total_gain > 0);
        assert_eq!(search.cost(), before - total_gain);
        assert_eq!(search.or_opt_step(), 0);
    }
}
