use crate::solver::{DEFAULT_PERIODS_PER_WEEK, EngineOptions};
use crate::workload::DEFAULT_WORKLOAD_CAP;
use std::net::SocketAddr;
use thiserror::Error as ThisError;

pub const BIND_VAR: &str = "TIMETABLE_BIND";
pub const WORKLOAD_CAP_VAR: &str = "TIMETABLE_WORKLOAD_CAP";
pub const PERIODS_VAR: &str = "TIMETABLE_PERIODS_PER_WEEK";
pub const FREE_CATEGORIES_VAR: &str = "TIMETABLE_FREE_CATEGORIES";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_FREE_CATEGORIES: [&str; 3] = ["Library", "Sports", "Mentoring"];

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Service settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub workload_cap: usize,
    pub engine: EngineOptions,
    pub default_free_categories: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress { var: BIND_VAR, value: bind.clone() })?;

        let workload_cap = positive(&lookup, WORKLOAD_CAP_VAR, DEFAULT_WORKLOAD_CAP)?;
        let periods_per_week = positive(&lookup, PERIODS_VAR, DEFAULT_PERIODS_PER_WEEK)?;

        let default_free_categories = match lookup(FREE_CATEGORIES_VAR) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_FREE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        };

        Ok(Self {
            bind_addr,
            workload_cap,
            engine: EngineOptions { periods_per_week },
            default_free_categories,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            workload_cap: DEFAULT_WORKLOAD_CAP,
            engine: EngineOptions::default(),
            default_free_categories: DEFAULT_FREE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

fn positive<F>(lookup: &F, var: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { var, value }),
        },
    }
}
