//! Report generation modules.

pub mod generator;

pub use generator::{generate_latex_standings, make_latex_file};
