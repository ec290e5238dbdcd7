use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Deserialize;

use crate::config_err;
use crate::error::{Error, Result};
use crate::replacement::PolicyType;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(config_err!("unknown output format '{}'", other)),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct Config {
    /// Number of frames. Signed so that a negative value coming from a file
    /// or the environment is reported as a configuration error rather than a
    /// deserialization failure.
    pub frames: i64,
    /// Upper bound accepted for `frames`, also the last capacity of a sweep.
    pub max_frames: i64,
    pub policy: PolicyType,
    pub lru_k: usize,

    /// Path of the CSV input, `-` for stdin.
    #[serde(default)]
    pub input: String,
    /// Name of the CSV column holding the page ids.
    pub column: String,

    pub log_level: String,
    pub format: OutputFormat,
}

impl Config {
    pub fn new(file: &str) -> Result<Config> {
        Config::with_overrides(file, &[])
    }

    /// Load the configuration from defaults, the optional file, `PAGESIM_*`
    /// environment variables and finally the given overrides, later sources
    /// winning over earlier ones.
    pub fn with_overrides(file: &str, overrides: &[(&str, String)]) -> Result<Config> {
        let mut cfg = config::Config::builder()
            .set_default("frames", 3)?
            .set_default("max_frames", 10)?
            .set_default("policy", "lru")?
            .set_default("lru_k", 2)?
            .set_default("input", "")?
            .set_default("column", "page")?
            .set_default("log_level", "info")?
            .set_default("format", "table")?;
        if !file.is_empty() {
            cfg = cfg.add_source(config::File::with_name(file))
        }
        cfg = cfg.add_source(config::Environment::with_prefix("PAGESIM"));
        for (key, value) in overrides {
            cfg = cfg.set_override(*key, value.as_str())?;
        }
        Ok(cfg.build()?.try_deserialize()?)
    }

    /// The validated frame capacity.
    pub fn capacity(&self) -> Result<usize> {
        if self.max_frames < 1 {
            return Err(config_err!("max_frames must be at least 1, got {}", self.max_frames));
        }
        if self.frames < 1 || self.frames > self.max_frames {
            return Err(config_err!(
                "frames must be within 1..={}, got {}",
                self.max_frames,
                self.frames
            ));
        }
        Ok(usize::try_from(self.frames)?)
    }

    /// Every capacity from 1 to max_frames, for a sweep.
    pub fn sweep_capacities(&self) -> Result<Vec<usize>> {
        if self.max_frames < 1 {
            return Err(config_err!("max_frames must be at least 1, got {}", self.max_frames));
        }
        let max = usize::try_from(self.max_frames)?;
        Ok((1..=max).collect())
    }

    pub fn log_level(&self) -> Result<log::LevelFilter> {
        Ok(self.log_level.parse::<log::LevelFilter>()?)
    }
}
