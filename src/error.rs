//! Error types shared by the library modules.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while importing, scoring, charting or reporting a season.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The points source had no table for the requested season.
    #[error("no points data available for season {0}")]
    DataUnavailable(String),

    /// The table could not be turned into a chart.
    #[error("cannot render chart: {0}")]
    Render(String),

    /// Filesystem failure while reading inputs or writing outputs.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// An archival season file is malformed.
    #[error("invalid archive {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    /// A stored season record could not be decoded.
    #[error("corrupt store record {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A round limit string was neither a positive number nor `champions`.
    #[error("invalid round limit '{0}' (use a round number or 'champions')")]
    InvalidRoundLimit(String),
}

impl ChartError {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ChartError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_context() {
        let err = ChartError::io(
            "Failed to create figure directory figures/2009",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("figures/2009"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_archive_error_display() {
        let err = ChartError::Archive {
            path: PathBuf::from("archive/2009.toml"),
            reason: "rounds list is empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid archive archive/2009.toml: rounds list is empty"
        );
    }
}
