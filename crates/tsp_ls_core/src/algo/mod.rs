mod or_opt;
mod relocate;
mod search;
mod two_opt;

pub use search::LocalSearch;

use tsp_ls_derive::New;

use crate::{
    Result,
    matrix::{Distance, DistanceMatrix},
};

/// Outcome of a full local-search run.
#[derive(Clone, Debug, New)]
pub struct Improvement {
    pub tour: Vec<usize>,
    pub initial_cost: Distance,
    pub final_cost: Distance,
    pub gain: Distance,
}

/// Improves `seed` to a local minimum under the combined 2-opt, relocate and
/// or-opt neighborhoods, then emits the tour starting at `start`.
#[tsp_ls_derive::timer("search")]
pub fn improve_tour(
    matrix: &DistanceMatrix,
    seed: &[usize],
    requested_threads: usize,
    start: usize,
) -> Result<Improvement> {
    let mut search = LocalSearch::new(matrix, seed, requested_threads)?;
    let initial_cost = search.cost();

    log::info!(
        "search: start n={} threads={} initial_cost={initial_cost}",
        search.n(),
        search.threads()
    );

    let gain = search.solve();
    let final_cost = search.cost();
    let drop_percent = if initial_cost > 0 {
        100.0 * gain as f64 / initial_cost as f64
    } else {
        0.0
    };

    log::info!(
        "search: complete final_cost={final_cost} gain={gain} ({drop_percent:.2}% of initial)"
    );

    Ok(Improvement::new(search.tour(start)?, initial_cost, final_cost, gain))
}

#[cfg(test)]
mod tests {
    use super::improve_tour;
    use crate::{matrix::DistanceMatrix, node::Node};

    fn crossed_square() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Node::new(0.0, 0.0),
            Node::new(10.0, 10.0),
            Node::new(10.0, 0.0),
            Node::new(0.0, 10.0),
        ])
    }

    #[test]
    fn improve_tour_reports_costs_and_gain_consistently() {
        let matrix = crossed_square();
        let improvement =
            improve_tour(&matrix, &[0, 1, 2, 3], 2, 0).expect("valid input");

        assert_eq!(improvement.initial_cost, 48);
        assert_eq!(improvement.final_cost, 40);
        assert_eq!(improvement.gain, 8);
        assert_eq!(
            improvement.initial_cost - improvement.gain,
            improvement.final_cost
        );
        assert_eq!(matrix.cycle_cost(&improvement.tour), 40);
        assert_eq!(improvement.tour[0], 0);
    }

    #[test]
    fn improve_tour_starts_the_emitted_tour_at_the_requested_node() {
        let matrix = crossed_square();
        let improvement =
            improve_tour(&matrix, &[0, 1, 2, 3], 1, 3).expect("valid input");
        assert_eq!(improvement.tour[0], 3);
        assert_eq!(improvement.tour.len(), 4);
    }

    #[test]
    fn improve_tour_rejects_an_out_of_range_start() {
        let matrix = crossed_square();
        let err = improve_tour(&matrix, &[0, 1, 2, 3], 1, 4).expect_err("bad start");
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn improve_tour_rejects_a_broken_permutation() {
        let matrix = crossed_square();
        let err = improve_tour(&matrix, &[0, 1, 1, 3], 1, 0).expect_err("duplicate id");
        assert!(err.to_string().contains("more than once"));
    }
}
