use std::{io, num::ParseIntError, path::PathBuf};

use thiserror::Error;

/// Failures while loading the startup parameter file. All of them are fatal,
/// the simulation must not start with a partially read configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read parameter file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parameter `{name}` is missing (expected on line {line})")]
    Missing { name: &'static str, line: usize },

    #[error("parameter `{name}` on line {line} is not an integer: {value:?}")]
    Malformed {
        name: &'static str,
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("parameter `{name}` = {value} is out of range, {reason}")]
    Invalid {
        name: &'static str,
        value: i64,
        reason: &'static str,
    },
}

/// Failures while saving sampled boid data.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("can't open data file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't write data point")]
    Csv(#[from] csv::Error),

    #[error("can't flush data file")]
    Flush(#[source] io::Error),
}
