//! Unpack configuration.
//!
//! Configuration comes from positional arguments, options and environment
//! variables (`FFINDEX_UNPACK_BATCHES`, `FFINDEX_UNPACK_LENIENT`), parsed with
//! clap and checked with [`UnpackConfig::validate`] before any file is
//! touched.

use crate::error::ConfigError;
use crate::plan::DEFAULT_NUM_BATCHES;
use clap::Parser;
use ffindex_format::ParseMode;
use std::path::PathBuf;
use tracing::Level;

/// Log verbosity accepted on the command line.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including per-line parse details
    Trace,
    /// Per-batch sizes
    Debug,
    /// Progress lines
    #[default]
    Info,
    /// Skipped lines and batches only
    Warn,
    /// Errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Settings for one unpack run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ffindex-unpack",
    about = "Unpack an FFindex archive into concatenated batch files",
    long_about = "Reads DATA_FILENAME and INDEX_FILENAME and writes the archived entries, \
                  terminator bytes removed, into OUT_DIR as <N>.txt batch files.",
    version
)]
pub struct UnpackConfig {
    /// FFindex data file
    #[arg(value_name = "DATA_FILENAME")]
    pub data: PathBuf,

    /// FFindex index file
    #[arg(value_name = "INDEX_FILENAME")]
    pub index: PathBuf,

    /// Existing directory the batch files are written to
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// Number of batches to split the entries into
    #[arg(
        short = 'n',
        long,
        env = "FFINDEX_UNPACK_BATCHES",
        default_value_t = DEFAULT_NUM_BATCHES
    )]
    pub batches: usize,

    /// Skip malformed index lines instead of failing
    #[arg(long, env = "FFINDEX_UNPACK_LENIENT")]
    pub lenient: bool,

    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl UnpackConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Configuration with default options for the given paths.
    pub fn new(
        data: impl Into<PathBuf>,
        index: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            data: data.into(),
            index: index.into(),
            out_dir: out_dir.into(),
            batches: DEFAULT_NUM_BATCHES,
            lenient: false,
            log_level: LogLevel::default(),
        }
    }

    /// Set the number of batches.
    #[must_use]
    pub const fn with_batches(mut self, batches: usize) -> Self {
        self.batches = batches;
        self
    }

    /// Enable or disable lenient index parsing.
    #[must_use]
    pub const fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// How malformed index lines are treated.
    pub const fn parse_mode(&self) -> ParseMode {
        if self.lenient {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the batch count is zero
    /// - the output directory does not exist or is not a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batches == 0 {
            return Err(ConfigError::ZeroBatches);
        }

        match std::fs::metadata(&self.out_dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ConfigError::OutputDir {
                path: self.out_dir.clone(),
                reason: "not a directory".to_string(),
            }),
            Err(e) => Err(ConfigError::OutputDir {
                path: self.out_dir.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_arguments() {
        let config =
            UnpackConfig::try_parse_from(["ffindex-unpack", "db.ffdata", "db.ffindex", "out"])
                .unwrap();

        assert_eq!(config.data, PathBuf::from("db.ffdata"));
        assert_eq!(config.index, PathBuf::from("db.ffindex"));
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.batches, DEFAULT_NUM_BATCHES);
        assert_eq!(config.parse_mode(), ParseMode::Strict);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_parse_options() {
        let config = UnpackConfig::try_parse_from([
            "ffindex-unpack",
            "--batches",
            "8",
            "--lenient",
            "--log-level",
            "debug",
            "db.ffdata",
            "db.ffindex",
            "out",
        ])
        .unwrap();

        assert_eq!(config.batches, 8);
        assert_eq!(config.parse_mode(), ParseMode::Lenient);
        assert_eq!(Level::from(config.log_level), Level::DEBUG);
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(UnpackConfig::try_parse_from(["ffindex-unpack", "db.ffdata", "db.ffindex"]).is_err());
    }

    #[test]
    fn test_validate_zero_batches() {
        let dir = tempfile::tempdir().unwrap();
        let config = UnpackConfig::new("d", "i", dir.path()).with_batches(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroBatches)));
    }

    #[test]
    fn test_validate_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(UnpackConfig::new("d", "i", dir.path()).validate().is_ok());

        let missing = UnpackConfig::new("d", "i", dir.path().join("missing"));
        assert!(matches!(
            missing.validate(),
            Err(ConfigError::OutputDir { .. })
        ));

        let file = dir.path().join("file");
        std::fs::write(&file, b"").unwrap();
        match UnpackConfig::new("d", "i", &file).validate() {
            Err(ConfigError::OutputDir { reason, .. }) => assert_eq!(reason, "not a directory"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
