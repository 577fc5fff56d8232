//! Multi-threaded steepest-descent local search for symmetric TSP tours.
//! A successor-array tour is improved with 2-opt, single-node relocate and
//! two-node or-opt moves until no operator finds a better tour.

mod algo;
mod error;
mod io;
pub mod logging;
mod matrix;
mod node;
mod seed;
mod tour;

pub use algo::{Improvement, LocalSearch, improve_tour};
pub use error::{Error, Result};
pub use io::input::SolverInput;
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use matrix::{Distance, DistanceMatrix};
pub use node::Node;
pub use seed::nearest_neighbor_tour;
pub use tour::TourGraph;
