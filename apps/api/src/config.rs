use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::engine::fitted::FitOptions;

/// Application configuration loaded from environment variables.
/// Startup fails if `CORPUS_PATH` is missing or any value is invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub corpus_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub holdout_fraction: f64,
    pub split_seed: u64,
    pub nb_alpha: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let corpus_path = lookup("CORPUS_PATH")
            .map(PathBuf::from)
            .context("Required environment variable 'CORPUS_PATH' is not set")?;

        let config = Config {
            corpus_path,
            port: parse_or(&lookup, "PORT", 5000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            holdout_fraction: parse_or(&lookup, "HOLDOUT_FRACTION", 0.2)?,
            split_seed: parse_or(&lookup, "SPLIT_SEED", 4)?,
            nb_alpha: parse_or(&lookup, "NB_ALPHA", 1.0)?,
        };

        ensure!(
            (0.0..1.0).contains(&config.holdout_fraction),
            "HOLDOUT_FRACTION must be in [0, 1), got {}",
            config.holdout_fraction
        );
        ensure!(
            config.nb_alpha > 0.0,
            "NB_ALPHA must be positive, got {}",
            config.nb_alpha
        );

        Ok(config)
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            holdout_fraction: self.holdout_fraction,
            split_seed: self.split_seed,
            alpha: self.nb_alpha,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
