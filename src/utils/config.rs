use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;

/// Settings of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub max_steps: usize,
    pub prefix: String,
    pub extension: String,
    pub output_dir: PathBuf,
    /// Random seed (if `None`, then random seed is generated)
    pub seed: Option<u64>,
    /// Probability of a cell being alive in the initial field
    pub fill_rate: f64,
    /// Worker threads; 0 lets rayon pick one per logical CPU
    pub threads: usize,
    /// RLE or P1 file placed in the middle of a blank field instead of random cells
    pub init: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: Self::DEFAULT_ROWS,
            cols: Self::DEFAULT_COLS,
            max_steps: Self::DEFAULT_MAX_STEPS,
            prefix: Self::DEFAULT_PREFIX.to_owned(),
            extension: Self::DEFAULT_EXTENSION.to_owned(),
            output_dir: PathBuf::from("."),
            seed: None,
            fill_rate: Self::DEFAULT_FILL_RATE,
            threads: 0,
            init: None,
        }
    }
}

impl Config {
    pub const DEFAULT_ROWS: usize = 100;
    pub const DEFAULT_COLS: usize = 100;
    pub const DEFAULT_MAX_STEPS: usize = 100;
    pub const DEFAULT_PREFIX: &'static str = "life";
    pub const DEFAULT_EXTENSION: &'static str = "ppm";
    pub const DEFAULT_FILL_RATE: f64 = 0.5;

    pub const USAGE: &'static str = "\
Usage: conway_frames [OPTIONS]

Options:
  --rows N       grid rows (default 100)
  --cols N       grid columns (default 100)
  --steps N      generations to simulate (default 100)
  --prefix S     output file name prefix (default life)
  --ext S        output file extension (default ppm)
  --out DIR      output directory, created if missing (default .)
  --seed N       random seed (default: from entropy)
  --fill F       initial probability of a live cell (default 0.5)
  --threads N    worker threads, 0 = all CPUs (default 0)
  --init FILE    start from an RLE or P1 pattern instead of random cells
  -h, --help     print this message";

    /// Parses command line arguments (without the program name).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args<I>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            if flag == "-h" || flag == "--help" {
                return Ok(None);
            }
            let value = args
                .next()
                .ok_or_else(|| anyhow!("missing value for {}", flag))?;
            match flag.as_str() {
                "--rows" => config.rows = parse_value(&flag, &value)?,
                "--cols" => config.cols = parse_value(&flag, &value)?,
                "--steps" => config.max_steps = parse_value(&flag, &value)?,
                "--prefix" => config.prefix = value,
                "--ext" => config.extension = value,
                "--out" => config.output_dir = PathBuf::from(value),
                "--seed" => config.seed = Some(parse_value(&flag, &value)?),
                "--fill" => config.fill_rate = parse_value(&flag, &value)?,
                "--threads" => config.threads = parse_value(&flag, &value)?,
                "--init" => config.init = Some(PathBuf::from(value)),
                _ => bail!("unknown option {}\n\n{}", flag, Self::USAGE),
            }
        }
        config.validate()?;
        Ok(Some(config))
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            bail!("grid size must be positive, got {}x{}", self.rows, self.cols);
        }
        if self.rows.checked_mul(self.cols).is_none() {
            bail!("grid size {}x{} is too large", self.rows, self.cols);
        }
        if !(0.0..=1.0).contains(&self.fill_rate) {
            bail!("fill rate must be within [0, 1], got {}", self.fill_rate);
        }
        if self.prefix.is_empty() {
            bail!("output prefix must not be empty");
        }
        Ok(())
    }
}

fn parse_value<T>(flag: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value {:?} for {}", value, flag))
}
