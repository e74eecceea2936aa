//! Minimal DOM helpers over html5ever/rcdom for catalog page extraction.

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse HTML bytes into a DOM, decoding with the given charset label and
/// falling back to lossy UTF-8 when the label is unknown.
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> RcDom {
    let s: String;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        s = string.to_string();
    } else {
        s = String::from_utf8_lossy(data).to_string();
    }

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .unwrap()
}

/// Get an attribute value from an element node.
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Whether an element carries `class_name` in its (whitespace-separated)
/// class attribute.
pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

/// Collect all descendant elements (including `node` itself) carrying the
/// given class.
pub fn find_nodes_by_class(node: &Handle, class_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if has_class(node, class_name) {
        found_nodes.push(node.clone());
    }
    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes_by_class(child_node, class_name));
    }

    found_nodes
}

/// Collect all descendant elements with the given tag name.
pub fn find_nodes_by_name(node: &Handle, node_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            found_nodes.push(node.clone());
        }
    }
    for child_node in node.children.borrow().iter() {
        found_nodes.append(&mut find_nodes_by_name(child_node, node_name));
    }

    found_nodes
}

/// Concatenated text content of a node's descendants.
pub fn node_text(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        out.push_str(&contents.borrow());
    }
    for child_node in node.children.borrow().iter() {
        collect_text(child_node, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<html><body>
        <ul>
          <li class="group-list-li first"><a href="/tags/12"><span class="label">  Action  </span></a></li>
          <li class="group-list-li"><a href="/tags/34"><span class="label">Drama</span></a></li>
        </ul>
    </body></html>"#;

    #[test]
    fn finds_nodes_by_class_among_multiple_classes() {
        let dom = html_to_dom(HTML.as_bytes(), "utf-8");
        let items = find_nodes_by_class(&dom.document, "group-list-li");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn reads_attrs_and_text() {
        let dom = html_to_dom(HTML.as_bytes(), "utf-8");
        let items = find_nodes_by_class(&dom.document, "group-list-li");
        let anchors = find_nodes_by_name(&items[0], "a");
        assert_eq!(anchors.len(), 1);
        assert_eq!(get_node_attr(&anchors[0], "href").as_deref(), Some("/tags/12"));
        assert_eq!(node_text(&anchors[0]).trim(), "Action");
    }

    #[test]
    fn unknown_charset_falls_back_to_utf8() {
        let dom = html_to_dom("<p class=\"x\">ok</p>".as_bytes(), "bogus-charset");
        assert_eq!(find_nodes_by_class(&dom.document, "x").len(), 1);
    }
}
