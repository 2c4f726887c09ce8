//! Logging config and setup helpers for the main binary.
//!
//! Stdout is reserved for the MCP stdio transport, so logs go to stderr unless
//! a log directory is configured.

mod defaults;
mod format_style;
mod log_rotation_kind;
mod parsers;

use std::path::PathBuf;

pub use format_style::FormatStyle;
pub use log_rotation_kind::LogRotationKind;
use serde::Deserialize;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, Layer as LayerTrait, Registry};

const LOG_FILE_PREFIX: &str = "thegraph_mcp_server";

/// Logging related options
#[derive(Debug, Deserialize)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(
        default = "defaults::log_level",
        deserialize_with = "parsers::from_str"
    )]
    pub level: Level,

    /// Directory for rolling log files. Logs go to stderr when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log file rotation period, only used with `path`
    #[serde(default = "defaults::default_rotation")]
    pub rotation: LogRotationKind,

    #[serde(default)]
    pub format: FormatStyle,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            path: None,
            rotation: defaults::default_rotation(),
            format: FormatStyle::default(),
        }
    }
}

type LoggingLayerResult = (
    Box<dyn LayerTrait<Registry> + Send + Sync>,
    Option<WorkerGuard>,
);

pub struct LoggingLayerBuilder {
    writer: Option<BoxMakeWriter>,
    worker_guard: Option<WorkerGuard>,
}

impl LoggingLayerBuilder {
    pub fn new() -> Self {
        Self {
            writer: None,
            worker_guard: None,
        }
    }

    // Lets tests capture output. Without it, build() picks a writer from the config.
    #[allow(dead_code)]
    pub fn with_writer<W>(mut self, mw: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.writer = Some(BoxMakeWriter::new(mw));
        self
    }

    pub fn build(mut self, logging: &Logging) -> Result<LoggingLayerResult, anyhow::Error> {
        if self.writer.is_none() {
            let (writer, guard) = build_writer(logging);
            self.writer = Some(writer);
            self.worker_guard = guard;
        }

        let Some(writer) = self.writer else {
            return Err(anyhow::Error::msg("No log writer set"));
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false);
        let formatted_layer = match logging.format {
            FormatStyle::Full => layer.with_writer(writer).boxed(),
            FormatStyle::Compact => layer.compact().with_writer(writer).boxed(),
            FormatStyle::Json => layer.json().with_writer(writer).boxed(),
            FormatStyle::Pretty => layer.pretty().with_writer(writer).boxed(),
        };

        Ok((formatted_layer, self.worker_guard))
    }
}

fn build_writer(logging: &Logging) -> (BoxMakeWriter, Option<WorkerGuard>) {
    let Some(path) = logging.path.clone() else {
        return (BoxMakeWriter::new(std::io::stderr), None);
    };

    std::fs::create_dir_all(&path)
        .map(|_| path)
        .inspect_err(|e| eprintln!("Failed to setup logging: {e:?}"))
        .ok()
        .and_then(|path| {
            RollingFileAppender::builder()
                .rotation(logging.rotation.clone().into())
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix("log")
                .build(path)
                .inspect_err(|e| eprintln!("Failed to setup logging: {e:?}"))
                .ok()
        })
        .map(|appender| {
            let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking_appender), Some(guard))
        })
        .unwrap_or_else(|| {
            eprintln!("Log file setup failed - falling back to stderr");
            (BoxMakeWriter::new(std::io::stderr), None)
        })
}

impl Logging {
    pub fn env_filter(logging: &Logging) -> Result<EnvFilter, anyhow::Error> {
        let mut env_filter = EnvFilter::from_default_env().add_directive(logging.level.into());

        if logging.level == Level::INFO {
            env_filter = env_filter.add_directive("rmcp=warn".parse()?);
        }
        Ok(env_filter)
    }
}
