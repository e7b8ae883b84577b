use crate::{engine, utils, Config, Field, FrameWriter, GridPair};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};

/// What a finished run reports.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub cols: usize,
    pub steps: usize,
    pub frames_written: usize,
    /// Alive cells in the last generation
    pub population: usize,
    pub elapsed: Duration,
}

/// Owns both buffers and the frame writer and drives the generation loop.
///
/// Every step saves generation `n - 1` while generation `n` is being computed;
/// the buffers are swapped only after both tasks have finished.
pub struct Simulation {
    grids: GridPair,
    writer: FrameWriter,
    generation: usize,
    max_steps: usize,
    threads: usize,
}

impl Simulation {
    pub fn new(initial: Field, writer: FrameWriter, max_steps: usize) -> Self {
        Self {
            grids: GridPair::new(initial),
            writer,
            generation: 0,
            max_steps,
            threads: 0,
        }
    }

    /// Builds generation 0 as described by `config` and prepares the output directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                config.output_dir.display()
            )
        })?;

        let initial = match &config.init {
            Some(path) => {
                log::info!("Loading start pattern from {}", path.display());
                let pattern = utils::load_pattern(path)?;
                utils::centered(&pattern, config.rows, config.cols)?
            }
            None => {
                match config.seed {
                    Some(seed) => log::info!("Random start with seed {}", seed),
                    None => log::info!("Random start with entropy seed"),
                }
                Field::random(config.rows, config.cols, config.seed, config.fill_rate)
            }
        };
        let writer = FrameWriter::new(&config.output_dir, &config.prefix, &config.extension);
        Ok(Self::new(initial, writer, config.max_steps).with_threads(config.threads))
    }

    /// Size of the rayon pool used by [`Simulation::run`]; 0 means one thread per logical CPU.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn grids(&self) -> &GridPair {
        &self.grids
    }

    /// Saves the current generation and computes the next one concurrently, then swaps.
    pub fn step(&mut self) -> Result<()> {
        let generation = self.generation;
        let writer = &self.writer;
        let (current, next) = self.grids.split();

        let (saved, ()) = rayon::join(
            || writer.write(current, generation),
            || engine::advance(current, next),
        );
        saved?;

        self.grids.swap();
        self.generation += 1;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "generation {}: population {}",
                self.generation,
                self.grids.current().population()
            );
        }
        Ok(())
    }

    /// Runs the remaining generations and saves the final one.
    ///
    /// Writes `max_steps + 1` frames in total when started from generation 0.
    pub fn run(mut self) -> Result<RunSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("failed to start worker threads")?;
        log::info!(
            "Simulating {} generations of a {}x{} torus on {} threads, frames go to {}",
            self.max_steps,
            self.grids.rows(),
            self.grids.cols(),
            pool.current_num_threads(),
            self.writer.dir().display()
        );

        let started = Instant::now();
        let first = self.generation;
        pool.install(|| -> Result<()> {
            while self.generation < self.max_steps {
                self.step()?;
            }
            Ok(())
        })?;
        // the last generation has no step of its own
        self.writer.write(self.grids.current(), self.generation)?;
        let elapsed = started.elapsed();

        let summary = RunSummary {
            rows: self.grids.rows(),
            cols: self.grids.cols(),
            steps: self.generation,
            frames_written: self.generation - first + 1,
            population: self.grids.current().population(),
            elapsed,
        };
        log::info!(
            "Done: {} frames, final population {}, {:.3}s",
            summary.frames_written,
            summary.population,
            elapsed.as_secs_f64()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::Simulation;
    use crate::{Config, Field, FrameWriter};
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "conway_frames_sim_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_step_writes_previous_generation() {
        let dir = scratch_dir("step");
        std::fs::create_dir_all(&dir).unwrap();
        let mut field = Field::blank(5, 5);
        for col in 1..4 {
            field.set(2, col, true);
        }
        let mut sim = Simulation::new(field.clone(), FrameWriter::new(&dir, "s", "pbm"), 3);

        sim.step().unwrap();
        assert_eq!(sim.generation(), 1);
        let saved = std::fs::read(dir.join("s_0_5*5.pbm")).unwrap();
        assert_eq!(crate::frame::decode(saved.as_slice()).unwrap(), field);
        assert!(sim.grids().get(1, 2) && sim.grids().get(3, 2));
        assert!(!dir.join("s_1_5*5.pbm").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_write_aborts_before_swap() {
        let dir = scratch_dir("fail").join("missing");
        let field = Field::random(4, 4, Some(42), 0.5);
        let mut sim = Simulation::new(field.clone(), FrameWriter::new(&dir, "s", "pbm"), 3);
        assert!(sim.step().is_err());
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grids().current(), &field);
        assert!(Simulation::new(field, FrameWriter::new(&dir, "s", "pbm"), 3)
            .run()
            .is_err());
    }

    #[test]
    fn test_zero_steps_writes_one_frame() {
        let dir = scratch_dir("zero");
        let config = Config {
            rows: 3,
            cols: 4,
            max_steps: 0,
            output_dir: dir.clone(),
            seed: Some(1),
            ..Config::default()
        };
        let summary = Simulation::from_config(&config).unwrap().run().unwrap();
        assert_eq!(summary.frames_written, 1);
        assert_eq!(summary.steps, 0);
        assert!(dir.join("life_0_3*4.ppm").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_init_pattern_from_config() {
        let dir = scratch_dir("init");
        std::fs::create_dir_all(&dir).unwrap();
        let pattern = dir.join("block.rle");
        std::fs::write(&pattern, "x = 2, y = 2\n2o$2o!\n").unwrap();
        let config = Config {
            rows: 6,
            cols: 6,
            max_steps: 4,
            output_dir: dir.clone(),
            init: Some(pattern),
            threads: 2,
            ..Config::default()
        };
        let summary = Simulation::from_config(&config).unwrap().run().unwrap();
        assert_eq!(summary.population, 4);
        assert_eq!(summary.frames_written, 5);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
