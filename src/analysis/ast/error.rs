use thiserror::Error;

#[derive(Debug, Error)]
pub enum AstError {
    #[error("source file too large ({size} bytes, limit {limit})")]
    SourceTooLarge { size: usize, limit: usize },

    #[error("failed to load the Go grammar: {0}")]
    GrammarUnavailable(String),

    #[error("illegal UTF-8 encoding at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("tree-sitter produced no syntax tree for this source")]
    ParseFailed,

    #[error("source contains {0} syntax error(s)")]
    SyntaxError(usize),

    #[error("source has no package clause")]
    MissingPackageClause,
}
