use crate::{
    Error, Result,
    matrix::{Distance, DistanceMatrix},
};

const MIN_CYCLE_NODES: usize = 2;

/// One Hamiltonian cycle over `0..n`, stored as a successor array:
/// `next[i]` is the node immediately after `i`.
///
/// Also carries the two read-only worker partition tables computed at
/// construction time. Both tables have `threads + 1` monotone entries
/// starting at 0 and ending at `n`.
#[derive(Clone, Debug)]
pub struct TourGraph {
    next: Vec<usize>,
    threads: usize,
    relocate_limits: Vec<usize>,
    two_opt_limits: Vec<usize>,
}

impl TourGraph {
    /// Builds the cycle `order[0] -> order[1] -> ... -> order[n-1] -> order[0]`.
    ///
    /// `order` must be a permutation of `0..n` with `n >= 2`. The requested
    /// worker count is clamped to `1..=n`.
    pub fn new(order: &[usize], requested_threads: usize) -> Result<Self> {
        let n = order.len();
        if n < MIN_CYCLE_NODES {
            return Err(Error::input(format!(
                "Need at least {MIN_CYCLE_NODES} nodes for a cycle, got {n}"
            )));
        }

        let mut next = vec![usize::MAX; n];
        for (rank, &node) in order.iter().enumerate() {
            if node >= n {
                return Err(Error::input(format!(
                    "Tour position {rank}: node id {node} is out of range for n={n}"
                )));
            }
            if next[node] != usize::MAX {
                return Err(Error::input(format!(
                    "Tour position {rank}: node id {node} appears more than once"
                )));
            }
            next[node] = order[(rank + 1) % n];
        }

        let threads = requested_threads.clamp(1, n);
        Ok(Self {
            next,
            threads,
            relocate_limits: build_relocate_limits(n, threads),
            two_opt_limits: build_two_opt_limits(n, threads),
        })
    }

    pub fn n(&self) -> usize {
        self.next.len()
    }

    /// Effective worker count (requested count clamped to `n`).
    pub fn threads(&self) -> usize {
        self.threads
    }

    #[inline]
    pub(crate) fn next(&self, node: usize) -> usize {
        self.next[node]
    }

    pub(crate) fn set_next(&mut self, node: usize, successor: usize) {
        self.next[node] = successor;
    }

    pub(crate) fn relocate_limits(&self) -> &[usize] {
        &self.relocate_limits
    }

    pub(crate) fn two_opt_limits(&self) -> &[usize] {
        &self.two_opt_limits
    }

    /// The cycle as an ordered sequence beginning at `start`.
    pub fn tour(&self, start: usize) -> Result<Vec<usize>> {
        if start >= self.n() {
            return Err(Error::input(format!(
                "start node {start} is out of range for n={}",
                self.n()
            )));
        }

        let mut order = Vec::with_capacity(self.n());
        order.push(start);
        let mut node = self.next(start);
        while node != start {
            order.push(node);
            node = self.next(node);
        }
        Ok(order)
    }

    /// Total cycle cost: every node contributes its outgoing edge.
    pub fn cost(&self, matrix: &DistanceMatrix) -> Distance {
        self.next
            .iter()
            .enumerate()
            .map(|(node, &successor)| matrix.dist(node, successor))
            .sum()
    }
}

/// Even split of `0..n` into `t` ranges whose lengths differ by at most 1;
/// the first `n % t` ranges take the extra element.
fn build_relocate_limits(n: usize, t: usize) -> Vec<usize> {
    let width = n / t;
    let remainder = n % t;

    let mut limits = Vec::with_capacity(t + 1);
    let mut bound = 0;
    limits.push(bound);
    for range in 0..t {
        bound += width + usize::from(range < remainder);
        limits.push(bound);
    }
    limits
}

/// Split of the 2-opt outer index `0..n` into `t` ranges of roughly equal
/// workload. With duplicate pairs skipped, outer index 0 performs `n - 3`
/// inner checks, index 1 the same, and each later index one fewer, so an
/// equal-length split would be imbalanced by a factor of `t`. Boundaries are
/// placed where the cumulative check count crosses each worker's share of
/// the `n * (n - 3) / 2` total.
fn build_two_opt_limits(n: usize, t: usize) -> Vec<usize> {
    let mut limits = Vec::with_capacity(t + 1);
    limits.push(0);

    if t > 1 {
        let mut cumulated_lookups = Vec::with_capacity(n - 1);
        let mut sum = n.saturating_sub(3);
        cumulated_lookups.push(sum);
        for outer in 1..(n - 1) {
            sum += (n - 2).saturating_sub(outer);
            cumulated_lookups.push(sum);
        }

        let total_lookups = n * n.saturating_sub(3) / 2;
        let lookup_share = total_lookups / t;

        let mut rank = 0;
        for worker in 1..t {
            while cumulated_lookups[rank] < worker * lookup_share {
                rank += 1;
            }
            rank += 1;
            limits.push(rank);
        }
    }

    limits.push(n);
    limits
}

#[cfg(test)]
mod tests {
    use super::{TourGraph, build_relocate_limits, build_two_opt_limits};
    use crate::{matrix::DistanceMatrix, node::Node};

    fn square_matrix() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Node::new(0.0, 0.0),
            Node::new(0.0, 1.0),
            Node::new(1.0, 1.0),
            Node::new(1.0, 0.0),
        ])
    }

    #[test]
    fn new_links_each_node_to_its_successor() {
        let graph = TourGraph::new(&[2, 0, 3, 1], 1).expect("valid tour");

        assert_eq!(graph.next(2), 0);
        assert_eq!(graph.next(0), 3);
        assert_eq!(graph.next(3), 1);
        assert_eq!(graph.next(1), 2);
    }

    #[test]
    fn new_rejects_too_few_nodes() {
        let err = TourGraph::new(&[0], 1).expect_err("single node");
        assert!(err.to_string().contains("at least 2 nodes"));
    }

    #[test]
    fn new_rejects_out_of_range_ids() {
        let err = TourGraph::new(&[0, 1, 4], 1).expect_err("id 4 with n=3");
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let err = TourGraph::new(&[0, 1, 1, 2], 1).expect_err("duplicate id");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn thread_count_is_clamped_to_n() {
        let graph = TourGraph::new(&[0, 1, 2], 8).expect("valid tour");
        assert_eq!(graph.threads(), 3);

        let graph = TourGraph::new(&[0, 1, 2], 0).expect("valid tour");
        assert_eq!(graph.threads(), 1);
    }

    #[test]
    fn tour_walks_the_cycle_from_any_start() {
        let graph = TourGraph::new(&[2, 0, 3, 1], 1).expect("valid tour");

        assert_eq!(graph.tour(2).expect("start in range"), vec![2, 0, 3, 1]);
        assert_eq!(graph.tour(3).expect("start in range"), vec![3, 1, 2, 0]);
    }

    #[test]
    fn tour_rejects_out_of_range_start() {
        let graph = TourGraph::new(&[0, 1, 2], 1).expect("valid tour");
        let err = graph.tour(3).expect_err("start out of range");
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn cost_matches_cycle_cost_of_the_emitted_order() {
        let matrix = square_matrix();
        let graph = TourGraph::new(&[0, 2, 1, 3], 1).expect("valid tour");
        let order = graph.tour(0).expect("start in range");

        assert_eq!(graph.cost(&matrix), matrix.cycle_cost(&order));
    }

    #[test]
    fn relocate_limits_split_evenly_with_remainder_up_front() {
        assert_eq!(build_relocate_limits(10, 3), vec![0, 4, 7, 10]);
        assert_eq!(build_relocate_limits(9, 3), vec![0, 3, 6, 9]);
        assert_eq!(build_relocate_limits(5, 1), vec![0, 5]);
        assert_eq!(build_relocate_limits(3, 3), vec![0, 1, 2, 3]);
    }

    #[test]
    fn relocate_limits_cover_every_index_exactly_once() {
        for (n, t) in [(2, 2), (7, 3), (50, 8), (11, 11)] {
            let limits = build_relocate_limits(n, t);
            assert_eq!(limits.len(), t + 1);
            assert_eq!(limits[0], 0);
            assert_eq!(limits[t], n);
            let sizes: Vec<usize> = limits.windows(2).map(|w| w[1] - w[0]).collect();
            assert_eq!(sizes.iter().sum::<usize>(), n);
            let max = sizes.iter().max().expect("nonempty");
            let min = sizes.iter().min().expect("nonempty");
            assert!(max - min <= 1);
        }
    }

    #[test]
    fn two_opt_limits_are_trivial_for_one_worker() {
        assert_eq!(build_two_opt_limits(10, 1), vec![0, 10]);
    }

    #[test]
    fn two_opt_limits_balance_the_lookup_workload() {
        let n = 40;
        let lookups = |outer: usize| -> usize {
            if outer == 0 {
                n - 3
            } else {
                (n - 2).saturating_sub(outer)
            }
        };

        for t in [2, 3, 8] {
            let limits = build_two_opt_limits(n, t);
            assert_eq!(limits.len(), t + 1);
            assert_eq!(limits[0], 0);
            assert_eq!(limits[t], n);
            assert!(limits.windows(2).all(|w| w[0] <= w[1]));

            let share = n * (n - 3) / 2 / t;
            for window in limits.windows(2) {
                let work: usize = (window[0]..window[1].min(n - 1)).map(lookups).sum();
                // Within one share quantum plus the largest single outer index.
                assert!(work <= share + (n - 3) + 1, "work={work} share={share}");
            }
        }
    }

    #[test]
    fn two_opt_limits_stay_in_bounds_for_tiny_cycles() {
        for n in 2..6 {
            for t in 1..=n {
                let limits = build_two_opt_limits(n, t);
                assert_eq!(limits.len(), t + 1);
                assert_eq!(limits[0], 0);
                assert_eq!(limits[t], n);
                assert!(limits.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}
