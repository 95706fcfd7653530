pub mod commands;
pub mod dataset;
pub mod render;
pub mod session_file;

pub use commands::{ShowOptions, run_collapse, run_expand, run_show};
