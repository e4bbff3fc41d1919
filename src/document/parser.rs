//! Builds the document tree from a tree-sitter-html syntax tree.
//!
//! ast-grep does the parsing, including implicit end tags (`<p>`, `<li>`,
//! `<td>`...) and raw text in `<script>`/`<style>`. Every piece of the tree
//! is cut from the byte range of its syntax node, and the gaps between nodes
//! are kept as text, so the tree always serializes back to the exact source.

use ast_grep_core::{AstGrep, Doc, Node as SyntaxNode};
use ast_grep_language::SupportLang;

use super::{Attribute, Element, Node};

pub(super) fn parse(source: &str) -> Vec<Node> {
    let grep = AstGrep::new(source, SupportLang::Html);
    let root = grep.root();
    nodes_in(&root, 0, source.len(), source)
}

/// Convert the children of `parent` that fall inside `start..end`
fn nodes_in<D: Doc>(parent: &SyntaxNode<'_, D>, start: usize, end: usize, source: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut cursor = start;

    for child in parent.children() {
        let range = child.range();
        if range.start < cursor || range.end > end || range.is_empty() {
            continue;
        }
        push_text(&mut nodes, &source[cursor..range.start]);
        convert(&child, source, &mut nodes);
        cursor = range.end;
    }

    push_text(&mut nodes, &source[cursor..end]);
    nodes
}

fn convert<D: Doc>(node: &SyntaxNode<'_, D>, source: &str, nodes: &mut Vec<Node>) {
    let range = node.range();
    let text = &source[range.clone()];
    let kind = node.kind();

    match &*kind {
        "element" | "script_element" | "style_element" => match element(node, source) {
            Some(element) => nodes.push(Node::Element(element)),
            None => nodes.push(Node::Raw(text.to_string())),
        },
        "text" | "entity" | "raw_text" => push_text(nodes, text),
        // recovered markup may still hold well-formed elements
        "ERROR" => {
            for inner in nodes_in(node, range.start, range.end, source) {
                match inner {
                    Node::Text(text) => push_text(nodes, &text),
                    other => nodes.push(other),
                }
            }
        }
        _ => nodes.push(Node::Raw(text.to_string())),
    }
}

fn element<D: Doc>(node: &SyntaxNode<'_, D>, source: &str) -> Option<Element> {
    let parts: Vec<_> = node.children().collect();
    let (start_tag, rest) = parts.split_first()?;

    let self_closing = match &*start_tag.kind() {
        "start_tag" => false,
        "self_closing_tag" => true,
        _ => return None,
    };
    let (name, attributes) = tag(start_tag, source)?;

    // implicitly closed elements have no end tag node
    let end_tag = rest
        .last()
        .filter(|last| last.kind() == "end_tag" && !last.range().is_empty());
    let content_end = end_tag.map_or(node.range().end, |end_tag| end_tag.range().start);

    Some(Element {
        name,
        attributes,
        self_closing,
        children: nodes_in(node, start_tag.range().end, content_end, source),
        source_start: Some(source[start_tag.range()].to_string()),
        source_end: end_tag.map(|end_tag| source[end_tag.range()].to_string()),
    })
}

fn tag<D: Doc>(node: &SyntaxNode<'_, D>, source: &str) -> Option<(String, Vec<Attribute>)> {
    let mut name = None;
    let mut attributes = Vec::new();

    for child in node.children() {
        match &*child.kind() {
            "tag_name" => name = Some(source[child.range()].to_string()),
            "attribute" => attributes.extend(attribute(&child, source)),
            _ => {}
        }
    }

    Some((name?, attributes))
}

fn attribute<D: Doc>(node: &SyntaxNode<'_, D>, source: &str) -> Option<Attribute> {
    let mut name = None;
    let mut value = None;

    for child in node.children() {
        let raw = &source[child.range()];
        match &*child.kind() {
            "attribute_name" => name = Some(raw.to_string()),
            "attribute_value" => value = Some((raw, raw)),
            "quoted_attribute_value" => {
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("");
                value = Some((raw, inner));
            }
            _ => {}
        }
    }

    Some(Attribute {
        name: name?,
        value: value.map(|(_, inner)| html_escape::decode_html_entities(inner).into_owned()),
        source: value.map(|(raw, _)| raw.to_string()),
    })
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    match nodes.last_mut() {
        Some(Node::Text(last)) => last.push_str(text),
        _ => nodes.push(Node::Text(text.to_string())),
    }
}
