/// Go parsing on top of tree-sitter
use tree_sitter::{Language, Node, Parser, Tree};

use crate::analysis::ast::error::AstError;

/// Node kinds of the tree-sitter Go grammar this crate inspects
pub mod kinds {
    pub const SOURCE_FILE: &str = "source_file";
    pub const PACKAGE_CLAUSE: &str = "package_clause";
    pub const RETURN_STATEMENT: &str = "return_statement";
    pub const EXPRESSION_LIST: &str = "expression_list";
    pub const IDENTIFIER: &str = "identifier";
    pub const FUNCTION_DECLARATION: &str = "function_declaration";
    pub const METHOD_DECLARATION: &str = "method_declaration";
}

/// Files above this size are skipped unless the config says otherwise
pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

pub fn go_language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

/// A parsed Go file together with the bytes its nodes point into.
pub struct SyntaxTree {
    tree: Tree,
    source: Vec<u8>,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text of `node`; empty when the span is not valid UTF-8
    pub fn text<'t>(&'t self, node: &Node<'t>) -> &'t str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Reusable Go parser.
///
/// Parsing is all-or-nothing: tree-sitter recovers from every syntax error and
/// still hands back a tree, but any tree that needed recovery is rejected so a
/// file is either analyzed in full or not at all.
pub struct GoParser {
    parser: Parser,
    max_file_bytes: usize,
}

impl GoParser {
    pub fn new() -> Result<Self, AstError> {
        Self::with_limit(DEFAULT_MAX_FILE_BYTES)
    }

    pub fn with_limit(max_file_bytes: usize) -> Result<Self, AstError> {
        let mut parser = Parser::new();
        parser
            .set_language(&go_language())
            .map_err(|e| AstError::GrammarUnavailable(e.to_string()))?;
        Ok(Self { parser, max_file_bytes })
    }

    pub fn parse(&mut self, source: Vec<u8>) -> Result<SyntaxTree, AstError> {
        if source.len() > self.max_file_bytes {
            return Err(AstError::SourceTooLarge {
                size: source.len(),
                limit: self.max_file_bytes,
            });
        }

        // Go sources are UTF-8; tree-sitter would accept stray bytes inside literals
        if let Err(e) = std::str::from_utf8(&source) {
            return Err(AstError::InvalidUtf8 { offset: e.valid_up_to() });
        }

        let tree = self.parser.parse(&source, None).ok_or(AstError::ParseFailed)?;
        check_tree(&tree)?;
        Ok(SyntaxTree { tree, source })
    }
}

fn check_tree(tree: &Tree) -> Result<(), AstError> {
    let root = tree.root_node();
    if root.has_error() {
        return Err(AstError::SyntaxError(count_errors(&root)));
    }

    let mut cursor = root.walk();
    let has_package = root
        .named_children(&mut cursor)
        .any(|child| child.kind() == kinds::PACKAGE_CLAUSE);
    if !has_package {
        return Err(AstError::MissingPackageClause);
    }
    Ok(())
}

fn count_errors(root: &Node) -> usize {
    let mut count = 0;
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            count += 1;
            continue;
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }
    count
}
