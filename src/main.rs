#![warn(clippy::all)]

use conway_frames::{Config, Simulation};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let timer = Instant::now();
    env_logger::init();

    let Some(config) = Config::from_args(std::env::args().skip(1))? else {
        println!("{}", Config::USAGE);
        return Ok(());
    };
    let summary = Simulation::from_config(&config)?.run()?;

    println!(
        "Grid size: {} * {}, number of iterations: {}",
        summary.rows, summary.cols, summary.steps
    );
    println!(
        "Program uses time: {:.3} seconds",
        timer.elapsed().as_secs_f64()
    );
    Ok(())
}
