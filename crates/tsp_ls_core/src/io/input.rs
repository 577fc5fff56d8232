use std::{fs, io::Read};

use tsp_ls_derive::KvDisplay;

use crate::{Error, Node, Result, io::options::SolverOptions};

/// Runtime input: the points to route.
#[derive(Clone, Debug, KvDisplay)]
pub struct SolverInput {
    #[kv(fmt = "len")]
    pub(crate) points: Vec<Node>,
}

impl SolverInput {
    pub fn new(points: &[Node]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }

    /// Reads points from the configured input file, or stdin when none is set.
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let raw = match options.input_path() {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        Ok(Self {
            points: parse_points(&raw)?,
        })
    }

    pub fn n(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Node] {
        &self.points
    }

    pub fn get_point(&self, idx: usize) -> Node {
        self.points[idx]
    }
}

fn parse_points(input: &str) -> Result<Vec<Node>> {
    let mut points = Vec::new();
    for (idx, tok) in input.split_whitespace().enumerate() {
        let mut it = tok.split(',');
        let x_s = it
            .next()
            .ok_or_else(|| Error::input(format!("Token {}: missing x value", idx + 1)))?;
        let y_s = it
            .next()
            .ok_or_else(|| Error::input(format!("Token {}: missing y value", idx + 1)))?;

        if it.next().is_some() {
            return Err(Error::input(format!(
                "Token {}: expected 'x,y' but got extra comma fields: {tok}",
                idx + 1
            )));
        }

        let x: f64 = x_s.parse().map_err(|_| {
            Error::input(format!("Token {}: invalid x value: {}", idx + 1, x_s))
        })?;
        let y: f64 = y_s.parse().map_err(|_| {
            Error::input(format!("Token {}: invalid y value: {}", idx + 1, y_s))
        })?;

        let point = Node::new(x, y);
        if !point.is_valid() {
            return Err(Error::input(format!(
                "Token {}: coordinates are not finite: {tok}",
                idx + 1
            )));
        }
        points.push(point);
    }

    if points.is_empty() {
        return Err(Error::input("No points provided."));
    }

    Ok(points)
}
