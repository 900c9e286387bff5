/// Tree-sitter visitor that finds returns of a bare error identifier
use std::convert::Infallible;
use tree_sitter::Node;

use crate::analysis::ast::languages::{kinds, SyntaxTree};

/// Identifier Go code conventionally uses for the error value
pub const DEFAULT_ERROR_IDENT: &str = "err";

/// One bare error identifier inside a return statement's result list
#[derive(Debug, Clone, Copy)]
pub struct ReturnSite<'t> {
    pub statement: Node<'t>,
    pub ident: Node<'t>,
}

impl ReturnSite<'_> {
    /// 1-based line of the matched identifier
    pub fn line(&self) -> usize {
        self.ident.start_position().row + 1
    }
}

/// Matches on spelling only: `return err` is a hit, while `return wrap(err)`,
/// `return (err)` and `return e.err` are not.
pub struct NakedReturnVisitor<'a> {
    error_ident: &'a str,
}

impl<'a> NakedReturnVisitor<'a> {
    pub fn new(error_ident: &'a str) -> Self {
        Self { error_ident }
    }

    /// Walk `tree` in document order and call `on_match` for every hit.
    ///
    /// A statement returning the identifier twice yields two sites. The first
    /// error returned by `on_match` stops the walk.
    pub fn visit<'t, E, F>(&self, tree: &'t SyntaxTree, mut on_match: F) -> Result<usize, E>
    where
        F: FnMut(ReturnSite<'t>) -> Result<(), E>,
    {
        let mut matches = 0;
        // Iterative traversal keeps deep trees off the call stack
        let mut stack: Vec<Node<'t>> = vec![tree.root()];

        while let Some(node) = stack.pop() {
            if node.kind() == kinds::RETURN_STATEMENT {
                for ident in self.bare_error_idents(tree, node) {
                    on_match(ReturnSite { statement: node, ident })?;
                    matches += 1;
                }
            }

            let mut cursor = node.walk();
            let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(matches)
    }

    /// Collect every site up front; handy when emission order is not needed
    pub fn collect<'t>(&self, tree: &'t SyntaxTree) -> Vec<ReturnSite<'t>> {
        let mut sites = Vec::new();
        let res = self.visit(tree, |site| {
            sites.push(site);
            Ok::<(), Infallible>(())
        });
        match res {
            Ok(_) => sites,
            Err(never) => match never {},
        }
    }

    fn bare_error_idents<'t>(&self, tree: &'t SyntaxTree, ret: Node<'t>) -> Vec<Node<'t>> {
        result_expressions(ret)
            .into_iter()
            .filter(|expr| expr.kind() == kinds::IDENTIFIER && tree.text(expr) == self.error_ident)
            .collect()
    }
}

impl Default for NakedReturnVisitor<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_IDENT)
    }
}

/// Returned expressions of a `return_statement`, left to right
fn result_expressions(ret: Node<'_>) -> Vec<Node<'_>> {
    let mut exprs = Vec::new();
    let mut cursor = ret.walk();
    for child in ret.named_children(&mut cursor) {
        if child.kind() == kinds::EXPRESSION_LIST {
            let mut list_cursor = child.walk();
            exprs.extend(
                child
                    .named_children(&mut list_cursor)
                    .filter(|n| !n.is_extra()),
            );
        } else if !child.is_extra() {
            exprs.push(child);
        }
    }
    exprs
}
