use std::fmt::{self, Display, Write};

use crate::parse::SyntaxNode;

/// Renders a syntax node and its descendants as an ASCII tree.
///
/// Only `kind()` and `children()` are consulted, plus the value of leaf
/// tokens that carry one.
pub struct DisplayTree<'a, 'de>(pub SyntaxNode<'a, 'de>);

impl Display for DisplayTree<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.0, "", true)
    }
}

fn write_node(
    out: &mut impl Write,
    node: SyntaxNode<'_, '_>,
    indent: &str,
    is_last: bool,
) -> fmt::Result {
    let marker = if is_last { "└──" } else { "├──" };
    write!(out, "{indent}{marker}{}", node.kind())?;
    if let SyntaxNode::Token(token) = node
        && let Some(value) = &token.value
    {
        write!(out, " {value}")?;
    }
    writeln!(out)?;

    let indent = format!("{indent}{}", if is_last { "    " } else { "│   " });
    let children = node.children();
    let last = children.len().saturating_sub(1);
    for (i, child) in children.into_iter().enumerate() {
        write_node(out, child, &indent, i == last)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::SyntaxTree;

    #[test]
    fn renders_binary_expression() {
        let tree = SyntaxTree::parse("1 + 2");
        let rendered = DisplayTree(SyntaxNode::Expression(&tree.root)).to_string();
        let expected = "\
└──BINARY_EXPRESSION
    ├──LITERAL_EXPRESSION
    │   └──NUMBER 1
    ├──PLUS
    └──LITERAL_EXPRESSION
        └──NUMBER 2
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn renders_parentheses_and_unary() {
        let tree = SyntaxTree::parse("-(true)");
        let rendered = DisplayTree(SyntaxNode::Expression(&tree.root)).to_string();
        let expected = "\
└──UNARY_EXPRESSION
    ├──MINUS
    └──PARENTHESIZED_EXPRESSION
        ├──OPEN_PAREN
        ├──LITERAL_EXPRESSION
        │   └──TRUE_KEYWORD true
        └──CLOSE_PAREN
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn a_single_token_is_one_line() {
        let tree = SyntaxTree::parse("7");
        let rendered = DisplayTree(SyntaxNode::Token(&tree.eof)).to_string();
        assert_eq!(rendered, "└──EOF\n");
    }
}
