mod config;
mod parse_rle;
mod pattern;

pub use config::Config;
pub use parse_rle::parse_rle;
pub use pattern::{centered, load_pattern};
