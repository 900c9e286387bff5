//! Finds Go functions that hand back a bare `err` and suggests wrapping it
//! with `fmt.Errorf` and a context phrase taken from the function name.
//!
//! ```text
//! pkg/a.go:6:fmt.Errorf("load config: %w", err)
//! ```

/// Walk, parse, detect and emit
pub mod analysis;

/// Defaults, environment and an optional JSON file
pub mod config;

pub mod error;

/// Suggestion template and output writers
pub mod formatting;

/// Which walked paths count as Go sources
pub mod ignore;

pub mod walker;

// Re-export commonly used types for convenience
pub use analysis::{Analyzer, FileOutcome, ScanStats};
pub use config::{load_config, Config, ConfigError};
pub use error::ScanError;
pub use formatting::{OutputFormat, Suggestion, SuggestionWriter, WrapTemplate};
pub use walker::{Candidate, SourceWalker};
