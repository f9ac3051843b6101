//! Small helpers over roxmltree nodes
//!
//! Catalog files declare a default namespace on the root element, so all
//! matching here goes by local name only.

use roxmltree::Node;

/// Check if a node is an element with the given local name
pub(crate) fn is_element(node: Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// Attribute value, or "" when the attribute is absent
pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> &'a str {
    node.attribute(name).unwrap_or("")
}

/// Descendant elements with the given local name, excluding the node itself
pub(crate) fn descendants<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .filter(move |n| *n != node && is_element(*n, name))
}

/// Direct child elements with the given local name
pub(crate) fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| is_element(*n, name))
}
