//! Lenient HTML document tree
//!
//! Documents are parsed with tree-sitter-html (through ast-grep) into a small
//! element tree that remembers the source text of every tag. Serializing a
//! tree writes untouched nodes back byte for byte; only elements whose
//! attributes were changed are rebuilt. Parsing never fails: markup the
//! grammar cannot place is kept as raw text.

mod parser;

/// Elements that never have children or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    /// Comments, doctypes, processing instructions and stray end tags, kept verbatim
    Raw(String),
    Element(Element),
}

impl Node {
    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) | Node::Raw(text) => out.push_str(text),
            Node::Element(element) => element.write_html(out),
        }
    }
}

/// A single attribute on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Decoded value, `None` for boolean attributes such as `defer`
    pub value: Option<String>,
    /// Value as written in the source (including quotes)
    source: Option<String>,
}

impl Attribute {
    fn write_html(&self, out: &mut String) {
        out.push(' ');
        out.push_str(&self.name);
        match (&self.source, &self.value) {
            (Some(source), _) => {
                out.push('=');
                out.push_str(source);
            }
            (None, Some(value)) => {
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            (None, None) => {}
        }
    }
}

/// An element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
    children: Vec<Node>,
    /// Source text of the start tag, dropped once an attribute changes
    source_start: Option<String>,
    /// Source text of the end tag; `None` for void and implicitly closed elements
    source_end: Option<String>,
}

impl Element {
    /// Tag name as written in the source
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name comparison, ASCII case-insensitive like HTML
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Value of an attribute, looked up case-insensitively
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
            .and_then(|attribute| attribute.value.as_deref())
    }

    /// Set (or add) an attribute; the element is rebuilt on serialization
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
        {
            Some(attribute) => {
                attribute.value = Some(value.to_string());
                attribute.source = None;
            }
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: Some(value.to_string()),
                source: None,
            }),
        }
        self.source_start = None;
    }

    /// Serialize this element and its subtree
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.source_start {
            Some(source) => out.push_str(source),
            None => {
                out.push('<');
                out.push_str(&self.name);
                for attribute in &self.attributes {
                    attribute.write_html(out);
                }
                if self.self_closing {
                    out.push_str(" /");
                }
                out.push('>');
            }
        }

        for child in &self.children {
            child.write_html(out);
        }

        match &self.source_end {
            Some(source) => out.push_str(source),
            // a rebuilt element that was closed implicitly gets an explicit end tag
            None if self.source_start.is_none() && !self.self_closing && !self.is_void() => {
                out.push_str("</");
                out.push_str(&self.name);
                out.push('>');
            }
            None => {}
        }
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.iter().any(|tag| self.is(tag))
    }
}

/// A parsed document, owned by whoever is rewriting it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            nodes: parser::parse(source),
        }
    }

    /// All elements satisfying `predicate`, in document order
    pub fn select<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        collect(&self.nodes, &predicate, &mut found);
        found
    }

    /// Walk the tree in document order and let `replace` decide, per element,
    /// whether it stays (`None`) or is swapped for a list of elements.
    ///
    /// Replacements take the original's place in order (an empty list removes
    /// it). Neither the replacements nor the subtree of a replaced element are
    /// visited again. Returns the number of replaced elements.
    pub fn replace_elements<F, E>(&mut self, mut replace: F) -> Result<usize, E>
    where
        F: FnMut(&Element) -> Result<Option<Vec<Element>>, E>,
    {
        replace_in(&mut self.nodes, &mut replace)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}

fn collect<'a, F>(nodes: &'a [Node], predicate: &F, found: &mut Vec<&'a Element>)
where
    F: Fn(&Element) -> bool,
{
    for node in nodes {
        if let Node::Element(element) = node {
            if predicate(element) {
                found.push(element);
            }
            collect(&element.children, predicate, found);
        }
    }
}

fn replace_in<F, E>(nodes: &mut Vec<Node>, replace: &mut F) -> Result<usize, E>
where
    F: FnMut(&Element) -> Result<Option<Vec<Element>>, E>,
{
    let mut replaced = 0;
    let mut index = 0;

    while index < nodes.len() {
        let replacement = match &nodes[index] {
            Node::Element(element) => replace(element)?,
            _ => None,
        };

        match replacement {
            Some(elements) => {
                let inserted = elements.len();
                nodes.splice(index..=index, elements.into_iter().map(Node::Element));
                index += inserted;
                replaced += 1;
            }
            None => {
                if let Node::Element(element) = &mut nodes[index] {
                    replaced += replace_in(&mut element.children, replace)?;
                }
                index += 1;
            }
        }
    }

    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_untouched_documents_serialize_verbatim() {
        let sources = [
            "",
            "<title>x</title><link href=\"*.css\"><div>y</div>",
            "<!DOCTYPE html>\n<html lang=en>\n<head><meta charset='utf-8'></head>\n<body class=\"a  b\">\n</body></html>\n",
            "<p>unclosed <b>bold <i>nested",
            "text with a < sign and </stray> end tag",
            "<!-- <img src=\"*.png\"> --><script>if (a < b) { document.write('</div>'); }</script>",
            "<br/><input disabled><IMG SRC=\"A.PNG\">",
            "<a href=\"x.html\"",
        ];

        for source in sources {
            assert_eq!(Document::parse(source).to_html(), source, "source: {:?}", source);
        }
    }

    #[test]
    fn test_select_in_document_order() {
        let document = Document::parse("<div><img src=\"a.png\"><p><img src=\"b.png\"></p></div><img src=\"c.png\">");
        let sources: Vec<_> = document
            .select(|element| element.is("img"))
            .into_iter()
            .filter_map(|element| element.attr("src"))
            .collect();
        assert_eq!(sources, vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn test_attribute_values_are_decoded() {
        let document = Document::parse("<a href='a&amp;b.html' title=\"&quot;x&#39;&#x41;\" download>link</a>");
        let links = document.select(|element| element.is("a"));
        assert_eq!(links[0].attr("href"), Some("a&b.html"));
        assert_eq!(links[0].attr("TITLE"), Some("\"x'A"));
        assert_eq!(links[0].attr("download"), None);
        assert!(links[0].attributes().iter().any(|a| a.name == "download"));
    }

    #[test]
    fn test_set_attr_rebuilds_only_that_element() {
        let mut document = Document::parse("<div  id=x><link rel=stylesheet href='*.css'></div>");
        document
            .replace_elements(|element| {
                if !element.is("link") {
                    return Ok::<_, Infallible>(None);
                }
                let mut clone = element.clone();
                clone.set_attr("href", "a \"b\".css");
                Ok(Some(vec![clone]))
            })
            .unwrap();
        assert_eq!(
            document.to_html(),
            "<div  id=x><link rel=stylesheet href=\"a &quot;b&quot;.css\"></div>"
        );
    }

    #[test]
    fn test_replace_with_many_and_with_none() {
        let mut document = Document::parse("<ul><li>keep</li><li class=\"t\">x</li></ul><hr>");
        let replaced = document
            .replace_elements(|element| {
                if element.is("hr") {
                    return Ok::<_, Infallible>(Some(Vec::new()));
                }
                if element.is("li") && element.attr("class") == Some("t") {
                    let mut first = element.clone();
                    first.set_attr("class", "one");
                    let mut second = element.clone();
                    second.set_attr("class", "two");
                    return Ok(Some(vec![first, second]));
                }
                Ok(None)
            })
            .unwrap();

        assert_eq!(replaced, 2);
        assert_eq!(
            document.to_html(),
            "<ul><li>keep</li><li class=\"one\">x</li><li class=\"two\">x</li></ul>"
        );
    }

    #[test]
    fn test_replaced_subtrees_are_not_revisited() {
        let mut document = Document::parse("<div data-x=\"1\"><div data-x=\"2\"></div></div>");
        let mut visited = Vec::new();
        document
            .replace_elements(|element| {
                visited.push(element.attr("data-x").map(str::to_string));
                Ok::<_, Infallible>(Some(vec![element.clone()]))
            })
            .unwrap();
        assert_eq!(visited, vec![Some("1".to_string())]);
    }

    #[test]
    fn test_replace_propagates_errors() {
        let mut document = Document::parse("<img src=\"*.png\"><img src=\"*.gif\">");
        let result = document.replace_elements(|element| match element.attr("src") {
            Some("*.gif") => Err("bad"),
            _ => Ok(None),
        });
        assert_eq!(result, Err("bad"));
    }

    #[test]
    fn test_rebuilt_unclosed_elements_get_an_end_tag() {
        let mut document = Document::parse("<a href=\"*.html\">x");
        document
            .replace_elements(|element| {
                let mut first = element.clone();
                first.set_attr("href", "a.html");
                let mut second = element.clone();
                second.set_attr("href", "b.html");
                Ok::<_, Infallible>(Some(vec![first, second]))
            })
            .unwrap();
        assert_eq!(document.to_html(), "<a href=\"a.html\">x</a><a href=\"b.html\">x</a>");
    }

    #[test]
    fn test_implicitly_closed_items_are_expanded_separately() {
        let mut document = Document::parse("<ul><li data-src=\"*.md\">a<li>b</ul>");
        document
            .replace_elements(|element| {
                if element.attr("data-src").is_none() {
                    return Ok::<_, Infallible>(None);
                }
                let mut clone = element.clone();
                clone.set_attr("data-src", "x.md");
                Ok(Some(vec![clone]))
            })
            .unwrap();
        assert_eq!(document.to_html(), "<ul><li data-src=\"x.md\">a</li><li>b</ul>");
    }

    #[test]
    fn test_cloned_elements_keep_children() {
        let mut document = Document::parse("<a href=\"hyper*.html\">link <b>text</b></a>");
        document
            .replace_elements(|element| {
                let mut clone = element.clone();
                clone.set_attr("href", "hyperlink.html");
                Ok::<_, Infallible>(Some(vec![clone]))
            })
            .unwrap();
        assert_eq!(document.to_html(), "<a href=\"hyperlink.html\">link <b>text</b></a>");
    }
}
