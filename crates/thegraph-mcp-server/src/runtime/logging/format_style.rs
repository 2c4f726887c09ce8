use serde::Deserialize;

/// Line format for server logs, written to stderr or the rolling log file.
///
/// Stdout is never used, whatever the style.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatStyle {
    /// One line per event with timestamp and level
    #[default]
    Full,
    Compact,
    /// One JSON object per line, for log files shipped to a collector
    Json,
    /// Multi-line events with source locations, for local debugging
    Pretty,
}
