// src/logging.rs
// =============================================================================
// Sets up the global tracing subscriber from the logger configuration.
//
// - disabled             -> nothing is installed, every log call is a no-op
// - pretty               -> human readable lines, otherwise JSON lines
// - file redirect        -> the same lines also go to <path>/<prefix>.log
//
// This runs once in main(); the rest of the code only uses tracing macros.
// =============================================================================

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer, Registry};

use crate::cli::LoggerArgs;
use crate::error::ConfigError;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

pub fn init(config: &LoggerArgs) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let mut layers: Vec<BoxedLayer> = vec![output_layer(config.pretty, std::io::stdout, true)];
    if config.file_redirect_enabled {
        let file = open_log_file(&config.file_redirect_path, &config.file_redirect_prefix)?;
        layers.push(output_layer(config.pretty, Mutex::new(file), false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(parse_level(&config.level))
        .try_init()?;
    Ok(())
}

fn output_layer<W>(pretty: bool, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if pretty {
        fmt::layer().with_writer(writer).with_ansi(ansi).boxed()
    } else {
        fmt::layer().json().with_writer(writer).boxed()
    }
}

fn open_log_file(dir: &str, prefix: &str) -> Result<std::fs::File, ConfigError> {
    if !Path::new(dir).is_dir() {
        return Err(ConfigError::MissingLogDirectory(dir.to_string()));
    }

    let path = Path::new(dir).join(format!("{prefix}.log"));
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ConfigError::LogFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Converts a level name to a filter. Unknown names fall back to ERROR.
fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        _ => LevelFilter::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_level("fatal"), LevelFilter::ERROR);
        assert_eq!(parse_level("nonsense"), LevelFilter::ERROR);
    }

    #[test]
    fn test_open_log_file_in_missing_directory() {
        let err = open_log_file("/definitely/not/here", "detective").unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingLogDirectory("/definitely/not/here".to_string())
        );
    }

    #[test]
    fn test_open_log_file_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        open_log_file(path, "detective").unwrap();
        assert!(dir.path().join("detective.log").exists());
    }
}
