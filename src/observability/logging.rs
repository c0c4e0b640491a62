//! tracing-subscriber setup
//!
//! Log lines always go to the console. When `file` is set they are also
//! written to a daily-rolled file next to it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use super::{ObservabilityError, ObservabilityResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Framework targets held at WARN unless `RUST_LOG` says otherwise
const QUIET_TARGETS: &[&str] = &["hyper", "tower_http"];

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn or error (default: "info")
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (default: text)
    #[serde(default)]
    pub format: LogFormat,

    /// Also write to daily files `<file>.YYYY-MM-DD` in the parent directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Check that `level` names a tracing level
    pub fn validate(&self) -> ObservabilityResult<()> {
        self.level
            .parse::<tracing::Level>()
            .map(|_| ())
            .map_err(|e| ObservabilityError::InvalidFilter {
                directive: self.level.clone(),
                reason: e.to_string(),
            })
    }

    /// Filter directives derived from the configured level
    pub fn directives(&self) -> String {
        let mut directives = self.level.to_lowercase();
        for target in QUIET_TARGETS {
            directives.push_str(&format!(",{}=warn", target));
        }
        directives
    }

    fn env_filter(&self) -> ObservabilityResult<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        let directives = self.directives();
        EnvFilter::try_new(&directives).map_err(|e| ObservabilityError::InvalidFilter {
            directive: directives,
            reason: e.to_string(),
        })
    }

    /// Daily-rolling appender for `file`, if configured
    fn rolling_file(&self) -> ObservabilityResult<Option<RollingFileAppender>> {
        let Some(path) = &self.file else {
            return Ok(None);
        };

        let log_file_error = |reason: String| ObservabilityError::LogFile {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, reason),
        };

        let prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| log_file_error("path has no file name".to_string()))?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .build(dir)
            .map(Some)
            .map_err(|e| log_file_error(e.to_string()))
    }

    /// Console layer, plus a file layer when `file` is set
    fn layers(&self) -> ObservabilityResult<Vec<BoxedLayer>> {
        let mut layers = vec![fmt_layer(self.format, std::io::stdout, true)];
        if let Some(appender) = self.rolling_file()? {
            layers.push(fmt_layer(self.format, appender, false));
        }
        Ok(layers)
    }
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> ObservabilityResult<()> {
    config.validate()?;

    let filter = config.env_filter()?;
    let layers = config.layers()?;

    tracing_subscriber::registry()
        .with(layers.with_filter(filter))
        .try_init()
        .map_err(|e| ObservabilityError::Install(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Text);
        assert!(config.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_directives_quiet_framework_targets() {
        let config = LoggingConfig {
            level: "DEBUG".to_string(),
            ..Default::default()
        };
        assert_eq!(config.directives(), "debug,hyper=warn,tower_http=warn");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ObservabilityError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"format": "json", "level": "warn"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn test_console_only_without_file() {
        let layers = LoggingConfig::default().layers().unwrap();
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn test_file_adds_rolling_layer() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file: Some(tmp.path().join("logs").join("app.log")),
            format: LogFormat::Json,
            ..Default::default()
        };

        let layers = config.layers().unwrap();
        assert_eq!(layers.len(), 2);

        let dir = tmp.path().join("logs");
        let rolled: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(rolled.len(), 1);
        assert!(rolled[0].starts_with("app.log."));
    }

    #[test]
    fn test_unwritable_log_dir_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let config = LoggingConfig {
            file: Some(blocker.join("app.log")),
            ..Default::default()
        };
        assert!(matches!(
            config.rolling_file(),
            Err(ObservabilityError::LogFile { .. })
        ));
    }

    #[test]
    fn test_second_init_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            file: Some(tmp.path().join("app.log")),
            ..Default::default()
        };

        assert!(init(&config).is_ok());
        assert!(matches!(init(&config), Err(ObservabilityError::Install(_))));
    }
}
