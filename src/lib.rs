#![warn(clippy::all)]

pub mod engine;
pub mod frame;
mod grid;
mod simulation;
mod utils;

pub use frame::FrameWriter;
pub use grid::{Field, GridPair};
pub use simulation::{RunSummary, Simulation};
pub use utils::{centered, load_pattern, parse_rle, Config};
