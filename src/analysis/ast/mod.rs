/// Go syntax analysis built on tree-sitter
pub mod context;
pub mod error;
pub mod languages;
pub mod visitor;

// Re-export main types for convenience
pub use context::{humanize_identifier, infer_context, FALLBACK_CONTEXT};
pub use error::AstError;
pub use languages::{GoParser, SyntaxTree};
pub use visitor::{NakedReturnVisitor, ReturnSite, DEFAULT_ERROR_IDENT};
