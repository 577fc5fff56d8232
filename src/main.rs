use std::fs;

use log::info;

use tsp_ls_core::{
    DistanceMatrix, Result, SolverInput, SolverOptions, improve_tour, logging,
    nearest_neighbor_tour,
};

fn main() -> Result<()> {
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;

    // We needed to init the logger before the timer macro
    main_inner(options)
}

#[tsp_ls_derive::timer("main")]
fn main_inner(options: SolverOptions) -> Result<()> {
    let input = SolverInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let matrix = DistanceMatrix::from_points(input.points());
    let seed = nearest_neighbor_tour(&matrix);
    let improvement = improve_tour(&matrix, &seed, options.threads, options.start)?;

    emit_route(&options, &input, &improvement.tour)
}

fn emit_route(options: &SolverOptions, input: &SolverInput, tour: &[usize]) -> Result<()> {
    let mut lines = String::new();
    for &idx in tour {
        if options.emit_ids {
            lines.push_str(&idx.to_string());
        } else {
            lines.push_str(&input.get_point(idx).to_string());
        }
        lines.push('\n');
    }

    match options.output_path() {
        Some(path) => fs::write(path, lines)?,
        None => print!("{lines}"),
    }
    Ok(())
}
