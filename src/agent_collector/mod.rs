//! Building the live roster from a roster file.
//!
//! ```toml
//! game = "hex13"
//! baselines = ["random", "simplemcts"]
//! generations = ["h1_229", "best_252"]
//!
//! [[series]]
//! prefix = "c2"
//! start = 252
//! step = 3
//! model_dir = "models/hexLG13"
//!
//! [openings]
//! candidates = ["c2", "k12", "a13"]
//! skip_probability = 0.25
//!
//! [referee]
//! command = "python"
//! args = ["referee.py", "hex13"]
//! ```
//!
//! A series lists `c2_252`, `c2_255`, ... for as long as `models/hexLG13/c2_<n>` exists. Relative
//! `model_dir`s are resolved against the directory of the roster file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::agent::NamedAgent;
use crate::error::ConfigurationError;
use crate::openings::WeightedOpenings;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Content of a roster file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterFile {
    /// Game identifier stored in the rating file.
    pub game: String,
    /// Hand-written agents, played under these exact names.
    #[serde(default)]
    pub baselines: Vec<String>,
    /// Individually listed trained generations.
    #[serde(default)]
    pub generations: Vec<String>,
    #[serde(default)]
    pub series: Vec<Series>,
    pub openings: Option<WeightedOpenings>,
    pub referee: Option<RefereeConfig>,
}

/// Numbered generations of one training run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Series {
    pub prefix: String,
    pub start: u32,
    #[serde(default = "default_step")]
    pub step: u32,
    /// Directory holding one `<prefix>_<n>` entry per generation.
    pub model_dir: PathBuf,
}

fn default_step() -> u32 {
    1
}

/// Program playing the games, see [`RefereeProcess`](crate::match_runner::RefereeProcess).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefereeConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Series {
    /// Names of the generations found on disk, stopping at the first missing one.
    pub fn generations(&self) -> Vec<String> {
        let mut names = vec![];
        let mut n = self.start;
        loop {
            let name = format!("{}_{n}", self.prefix);
            if !self.model_dir.join(&name).exists() {
                debug!("series '{}' stops before {name}", self.prefix);
                break;
            }
            names.push(name);
            let Some(next) = n.checked_add(self.step) else {
                break;
            };
            n = next;
        }
        names
    }
}

impl RosterFile {
    /// Parses a roster from TOML. Relative paths are kept as written.
    pub fn parse(contents: &str) -> anyhow::Result<RosterFile> {
        let roster: RosterFile = toml::from_str(contents).context("invalid roster file")?;
        roster.validate()?;
        Ok(roster)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.game.trim().is_empty() {
            return Err(ConfigurationError::Invalid("empty game name".into()));
        }
        if let Some(series) = self.series.iter().find(|s| s.step == 0) {
            return Err(ConfigurationError::Invalid(format!(
                "series '{}' has a step of 0",
                series.prefix
            )));
        }
        if let Some(openings) = &self.openings {
            if !(0.0..=1.0).contains(&openings.skip_probability) {
                return Err(ConfigurationError::Invalid(format!(
                    "skip_probability {} is not a probability",
                    openings.skip_probability
                )));
            }
        }
        Ok(())
    }

    /// Live roster: baselines, then listed generations, then every series in file order.
    pub fn agents(&self) -> Vec<NamedAgent> {
        self.baselines
            .iter()
            .chain(&self.generations)
            .cloned()
            .chain(self.series.iter().flat_map(Series::generations))
            .map(NamedAgent::new)
            .collect()
    }
}

/// Reads the roster file at `path`.
#[instrument]
pub fn collect_roster(path: &Path) -> anyhow::Result<RosterFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read roster file {path:?}"))?;
    let mut roster = RosterFile::parse(&contents).with_context(|| format!("in {path:?}"))?;

    let base = path.parent().unwrap_or(Path::new(""));
    for series in &mut roster.series {
        if series.model_dir.is_relative() {
            series.model_dir = base.join(&series.model_dir);
        }
    }
    info!(
        game = %roster.game,
        baselines = roster.baselines.len(),
        generations = roster.generations.len(),
        series = roster.series.len(),
        "roster collected"
    );
    Ok(roster)
}

/// Prints what each part of the roster contributes.
pub fn print_roster(roster: &RosterFile, agents: &[NamedAgent]) {
    println!("Collecting agents for '{}'...", roster.game);
    println!(
        "{:·<24} {GREEN}{}{RESET}",
        "baselines ",
        roster.baselines.len()
    );
    println!(
        "{:·<24} {GREEN}{}{RESET}",
        "generations ",
        roster.generations.len()
    );
    for series in &roster.series {
        let found = series.generations().len();
        let colour = if found == 0 { YELLOW } else { GREEN };
        println!("{:·<24} {colour}{found}{RESET}", format!("{} ", series.prefix));
    }
    println!("{} agents", agents.len());
}
