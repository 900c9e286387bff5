use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::ast::AstError;
use crate::config::ConfigError;

/// Failures that abort a scan. Everything else is skipped and logged.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot walk {}: {source}", root.display())]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up the Go parser: {0}")]
    Parser(#[from] AstError),

    #[error("failed to write suggestion: {0}")]
    Output(#[from] std::io::Error),
}
