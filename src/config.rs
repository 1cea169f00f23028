use crate::input::DEFAULT_ZERO_EPSILON;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Digits printed after the decimal point.
    pub precision: usize,
    /// Magnitudes below this count as zero. Only the signed input rule
    /// consults it; the calculator's own prompts accept positive values
    /// only, so changing it has no visible effect on them.
    pub zero_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: 6,
            zero_epsilon: DEFAULT_ZERO_EPSILON,
        }
    }
}

impl Config {
    fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ohmcalc").join("config.toml"))
    }

    /// Loads the user's settings file, falling back to defaults when there is
    /// none. Nothing is ever written.
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            bail!(
                "precision {} exceeds the maximum of {}",
                self.precision,
                MAX_PRECISION
            );
        }
        if !self.zero_epsilon.is_finite() || self.zero_epsilon < 0.0 {
            bail!("zero_epsilon must be a finite, non-negative number");
        }
        Ok(())
    }
}
