//! Enclosing-function lookup and the context phrase derived from it.
use tree_sitter::Node;

use crate::analysis::ast::languages::{kinds, SyntaxTree};

/// Phrase used when a return site has no enclosing declaration
pub const FALLBACK_CONTEXT: &str = "operation";

fn is_function_scope(node: &Node) -> bool {
    matches!(
        node.kind(),
        kinds::FUNCTION_DECLARATION | kinds::METHOD_DECLARATION
    )
}

fn contains(outer: &Node, inner: &Node) -> bool {
    inner.start_byte() >= outer.start_byte() && inner.end_byte() <= outer.end_byte()
}

/// Find the function or method declaration whose span contains `site`.
///
/// The search starts at `root` and walks in document order, only descending
/// into nodes that contain the site. The first declaration found wins and the
/// search stops there. Function literals are not declarations, so a return
/// inside a closure resolves to the named declaration around the closure.
pub fn enclosing_function<'t>(root: Node<'t>, site: &Node<'t>) -> Option<Node<'t>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !contains(&node, site) {
            continue;
        }
        if is_function_scope(&node) {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        // Reverse so the leftmost child is popped first
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Declared name of the function enclosing `site`, if any
pub fn enclosing_function_name<'t>(tree: &'t SyntaxTree, site: &Node<'t>) -> Option<&'t str> {
    let func = enclosing_function(tree.root(), site)?;
    let name = func.child_by_field_name("name")?;
    let text = tree.text(&name);
    (!text.is_empty()).then_some(text)
}

/// Context phrase for a return site, falling back to `fallback` when no
/// enclosing declaration exists.
pub fn infer_context<'t>(tree: &'t SyntaxTree, site: &Node<'t>, fallback: &str) -> String {
    match enclosing_function_name(tree, site) {
        Some(name) => humanize_identifier(name),
        None => fallback.to_string(),
    }
}

/// `ValidateInput` -> `validate input`.
///
/// Every ASCII uppercase letter after the first character gets a space in
/// front of it; the result is then lowercased.
pub fn humanize_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.char_indices() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out.to_lowercase()
}
