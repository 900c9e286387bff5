use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::ast::context::FALLBACK_CONTEXT;
use crate::analysis::ast::languages::DEFAULT_MAX_FILE_BYTES;
use crate::analysis::ast::visitor::DEFAULT_ERROR_IDENT;
use crate::formatting::{OutputFormat, TemplateError, WrapTemplate};
use crate::ignore::{build_globset, SourceFilter};

pub const ENV_IDENT: &str = "ERRWRAP_IDENT";
pub const ENV_TEMPLATE: &str = "ERRWRAP_TEMPLATE";
pub const ENV_IGNORE_GLOBS: &str = "ERRWRAP_IGNORE_GLOBS";
pub const ENV_CONFIG_FILE: &str = "ERRWRAP_CONFIG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("invalid ignore glob: {0}")]
    Glob(#[from] globset::Error),

    #[error("{0:?} is not a valid Go identifier")]
    InvalidIdent(String),

    #[error("max_file_bytes must be greater than zero")]
    ZeroFileLimit,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub error_ident: String,
    pub template: WrapTemplate,
    pub fallback_label: String,
    pub ignore_globs: Vec<String>,
    pub max_file_bytes: usize,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_ident: DEFAULT_ERROR_IDENT.to_string(),
            template: WrapTemplate::default(),
            fallback_label: FALLBACK_CONTEXT.to_string(),
            // Empty means: only the built-in vendor/generated/extension rules
            ignore_globs: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_go_identifier(&self.error_ident) {
            return Err(ConfigError::InvalidIdent(self.error_ident.clone()));
        }
        if self.max_file_bytes == 0 {
            return Err(ConfigError::ZeroFileLimit);
        }
        build_globset(&self.ignore_globs)?;
        Ok(())
    }

    pub fn source_filter(&self) -> Result<SourceFilter, ConfigError> {
        Ok(SourceFilter::new(build_globset(&self.ignore_globs)?))
    }
}

/// Shape of the JSON config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    ident: Option<String>,
    template: Option<String>,
    fallback_label: Option<String>,
    ignore_globs: Option<Vec<String>>,
    max_file_bytes: Option<usize>,
    format: Option<OutputFormat>,
}

/// Load configuration from the process environment and, when one is named,
/// a JSON file. `file` wins over `ERRWRAP_CONFIG_FILE`.
pub fn load_config(file: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with(file, |key| std::env::var(key).ok())
}

/// Defaults, then environment, then the JSON file (which wins over env).
///
/// A config file is only read when the caller or `ERRWRAP_CONFIG_FILE` names
/// one, and a named file must exist and parse. Nothing in the scanned tree is
/// picked up implicitly. `env` stands in for `std::env::var` so callers and
/// tests can supply their own variables.
pub fn load_config_with<F>(file: Option<&Path>, env: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();

    if let Some(ident) = env(ENV_IDENT).filter(|v| !v.trim().is_empty()) {
        cfg.error_ident = ident.trim().to_string();
    }
    if let Some(template) = env(ENV_TEMPLATE).filter(|v| !v.is_empty()) {
        cfg.template = WrapTemplate::parse(&template)?;
    }
    if let Some(globs) = env(ENV_IGNORE_GLOBS) {
        cfg.ignore_globs = split_list(&globs);
    }

    let cfg_path = file
        .map(Path::to_path_buf)
        .or_else(|| env(ENV_CONFIG_FILE).filter(|v| !v.is_empty()).map(PathBuf::from));
    if let Some(path) = cfg_path {
        let parsed = read_file_config(&path)?;
        apply_file_config(&mut cfg, parsed)?;
        tracing::debug!(path = %path.display(), "config file applied");
    }

    cfg.validate()?;
    tracing::debug!(
        ident = %cfg.error_ident,
        template = cfg.template.as_str(),
        globs = cfg.ignore_globs.len(),
        "configuration loaded"
    );
    Ok(cfg)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

fn apply_file_config(cfg: &mut Config, file: FileConfig) -> Result<(), ConfigError> {
    if let Some(ident) = file.ident {
        cfg.error_ident = ident;
    }
    if let Some(template) = file.template {
        cfg.template = WrapTemplate::parse(&template)?;
    }
    if let Some(label) = file.fallback_label {
        cfg.fallback_label = label;
    }
    if let Some(globs) = file.ignore_globs {
        cfg.ignore_globs = globs;
    }
    if let Some(limit) = file.max_file_bytes {
        cfg.max_file_bytes = limit;
    }
    if let Some(format) = file.format {
        cfg.format = format;
    }
    Ok(())
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_go_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
