use crate::matrix::DistanceMatrix;

/// Deterministic nearest-neighbor seed tour over all nodes of `matrix`,
/// beginning at node 0. Ties go to the lower node id.
///
/// Quality is nothing special; the point is handing the local search a
/// reasonable, reproducible starting permutation.
pub fn nearest_neighbor_tour(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.n();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut nearest: Option<usize> = None;
        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let closer = match nearest {
                Some(node) => matrix.dist(current, candidate) < matrix.dist(current, node),
                None => true,
            };
            if closer {
                nearest = Some(candidate);
            }
        }

        let Some(node) = nearest else {
            break;
        };
        visited[node] = true;
        order.push(node);
        current = node;
    }

    order
}

#[cfg(test)]
mod tests {
    use super::nearest_neighbor_tour;
    use crate::{matrix::DistanceMatrix, node::Node};

    #[test]
    fn follows_the_nearest_unvisited_node() {
        let matrix = DistanceMatrix::from_points(&[
            Node::new(0.0, 0.0),
            Node::new(50.0, 0.0),
            Node::new(10.0, 0.0),
            Node::new(20.0, 0.0),
        ]);

        assert_eq!(nearest_neighbor_tour(&matrix), vec![0, 2, 3, 1]);
    }

    #[test]
    fn visits_every_node_exactly_once() {
        let points: Vec<Node> = (0..12)
            .map(|idx| Node::new((idx * 7 % 12) as f64, (idx * 5 % 12) as f64))
            .collect();
        let matrix = DistanceMatrix::from_points(&points);

        let mut order = nearest_neighbor_tour(&matrix);
        assert_eq!(order.len(), 12);
        order.sort_unstable();
        assert_eq!(order, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn ties_resolve_to_the_lower_id() {
        // Nodes 1 and 2 are equally far from node 0.
        let matrix = DistanceMatrix::from_points(&[
            Node::new(0.0, 0.0),
            Node::new(10.0, 0.0),
            Node::new(-10.0, 0.0),
        ]);

        assert_eq!(nearest_neighbor_tour(&matrix), vec![0, 1, 2]);
    }

    #[test]
    fn empty_input_yields_an_empty_tour() {
        let matrix = DistanceMatrix::from_points(&[]);
        assert!(nearest_neighbor_tour(&matrix).is_empty());
    }
}
