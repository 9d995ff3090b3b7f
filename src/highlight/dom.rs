use super::{Fragment, TermMatcher};
use wasm_bindgen::JsCast;

const MARK_TAG: &str = "mark";
const MARK_ATTR: &str = "data-highlight";

fn is_skipped_element(el: &web_sys::Element) -> bool {
    matches!(
        el.tag_name().to_ascii_lowercase().as_str(),
        "script" | "style" | "textarea" | "input" | MARK_TAG
    )
}

/// Replace previous highlights with their plain text so a new pass starts clean.
fn unmark(root: &web_sys::Element) {
    let Ok(marks) = root.query_selector_all(&format!("{MARK_TAG}[{MARK_ATTR}]")) else {
        return;
    };

    for i in 0..marks.length() {
        let Some(mark) = marks.item(i) else {
            continue;
        };
        let Some(parent) = mark.parent_node() else {
            continue;
        };
        let text = mark.text_content().unwrap_or_default();
        if let Some(doc) = mark.owner_document() {
            let _ = parent.replace_child(&doc.create_text_node(&text), &mark);
        }
    }

    // Merge the split text nodes back together.
    root.normalize();
}

fn collect_text_nodes(node: &web_sys::Node, out: &mut Vec<web_sys::Text>) {
    let children = node.child_nodes();
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            continue;
        };

        if let Some(text) = child.dyn_ref::<web_sys::Text>() {
            out.push(text.clone());
        } else if let Some(el) = child.dyn_ref::<web_sys::Element>() {
            if !is_skipped_element(el) {
                collect_text_nodes(&child, out);
            }
        }
    }
}

fn mark_text_node(
    doc: &web_sys::Document,
    node: &web_sys::Text,
    matcher: &TermMatcher,
    marks: &mut Vec<web_sys::Element>,
) {
    let text = node.data();
    let fragments = matcher.fragments(&text);
    if !fragments.iter().any(|f| matches!(f, Fragment::Mark(_))) {
        return;
    }

    let node: &web_sys::Node = node;
    let Some(parent) = node.parent_node() else {
        return;
    };

    for fragment in fragments {
        let inserted: web_sys::Node = match fragment {
            Fragment::Text(s) => doc.create_text_node(&s).into(),
            Fragment::Mark(s) => {
                let Ok(mark) = doc.create_element(MARK_TAG) else {
                    continue;
                };
                let _ = mark.set_attribute(MARK_ATTR, "");
                mark.set_text_content(Some(&s));
                marks.push(mark.clone());
                mark.into()
            }
        };
        let _ = parent.insert_before(&inserted, Some(node));
    }
    let _ = parent.remove_child(node);
}

/// Highlight `term` inside `root`, returning the created `<mark>` elements in document order.
///
/// Existing highlights are removed first, so running this twice over the same
/// subtree leaves a single set of marks.
pub(crate) fn highlight_subtree(root: &web_sys::Element, term: &str) -> Vec<web_sys::Element> {
    unmark(root);

    let matcher = TermMatcher::new(term);
    if matcher.is_empty() {
        return vec![];
    }

    let Some(doc) = root.owner_document() else {
        return vec![];
    };

    let mut nodes = Vec::new();
    collect_text_nodes(root, &mut nodes);

    let mut marks = Vec::new();
    for node in &nodes {
        mark_text_node(&doc, node, &matcher, &mut marks);
    }
    marks
}
