//! The "Recent checks" panel as a small element tree.
//!
//! The tree is rendered into the index page, and it is also the
//! [`ClickableItemSource`] the history click handler runs against, so the
//! click behaviour can be driven without a browser.

use crate::history_click::{
    ClickableItemSource, HistoryItem, CONTAINER_CLASS, ITEM_CLASS, POSITION_ATTRIBUTE,
};
use crate::models::HistoryEntry;
use crate::ui::escape_html;

pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Element {
    tag: &'static str,
    classes: Vec<&'static str>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PanelDom {
    nodes: Vec<Element>,
}

impl PanelDom {
    fn new(tag: &'static str, classes: &[&'static str]) -> Self {
        Self {
            nodes: vec![Element {
                tag,
                classes: classes.to_vec(),
                attributes: Vec::new(),
                text: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn append(&mut self, parent: NodeId, tag: &'static str, classes: &[&'static str]) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Element {
            tag,
            classes: classes.to_vec(),
            attributes: Vec::new(),
            text: None,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn append_text(
        &mut self,
        parent: NodeId,
        tag: &'static str,
        classes: &[&'static str],
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.append(parent, tag, classes);
        self.nodes[id].text = Some(text.into());
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let attributes = &mut self.nodes[node].attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node].attributes.retain(|(key, _)| key != name);
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|element| element.classes.iter().any(|name| *name == class))
    }

    /// First element in document order carrying `class`.
    pub fn query_class(&self, class: &str) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if self.has_class(node, class) {
                return Some(node);
            }
            stack.extend(self.nodes[node].children.iter().rev());
        }
        None
    }

    pub fn query_class_all(&self, class: &str) -> Vec<NodeId> {
        let mut matched = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if self.has_class(node, class) {
                matched.push(node);
            }
            stack.extend(self.nodes[node].children.iter().rev());
        }
        matched
    }

    pub fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = self.nodes.get(node).map(|_| node);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.nodes[current].parent;
        }
        None
    }

    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.nodes.get(node).map(|_| node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes[current].parent;
        }
        false
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root(), &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let element = &self.nodes[node];
        out.push('<');
        out.push_str(element.tag);
        if !element.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&element.classes.join(" "));
            out.push('"');
        }
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
        }
        out.push('>');
        if let Some(text) = &element.text {
            out.push_str(&escape_html(text));
        }
        for child in &element.children {
            self.write_html(*child, out);
        }
        out.push_str(&format!("</{}>", element.tag));
    }
}

impl ClickableItemSource for PanelDom {
    type Container = NodeId;
    type Target = NodeId;

    fn find_container(&self) -> Option<NodeId> {
        self.query_class(CONTAINER_CLASS)
    }

    fn find_item(&self, container: &NodeId, target: &NodeId) -> Option<HistoryItem> {
        let item = self.closest(*target, ITEM_CLASS)?;
        if !self.contains(*container, item) {
            return None;
        }
        Some(HistoryItem {
            position_marker: self.attribute(item, POSITION_ATTRIBUTE).map(str::to_string),
        })
    }
}

/// Builds the panel for `history` (oldest first). Items are laid out newest
/// first and `data-index` counts from 0 at the top.
pub fn build_history_panel(history: &[HistoryEntry]) -> PanelDom {
    let mut dom = PanelDom::new("div", &["card", "history-card"]);
    let root = dom.root();
    dom.append_text(root, "div", &["card-header"], "Recent checks");

    if history.is_empty() {
        dom.append_text(root, "p", &["empty"], "No checks yet.");
        return dom;
    }

    let list = dom.append(root, "ul", &["list-group", CONTAINER_CLASS]);
    for (position, entry) in history.iter().rev().enumerate() {
        let item = dom.append(list, "li", &["list-group-item", ITEM_CLASS]);
        dom.set_attribute(item, POSITION_ATTRIBUTE, position.to_string());
        dom.append_text(item, "span", &["timestamp"], entry.timestamp.clone());
        let up = entry.results.iter().filter(|result| result.status.is_up()).count();
        dom.append_text(
            item,
            "span",
            &["badge"],
            format!("{up}/{} up", entry.results.len()),
        );
    }
    dom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history_click::{HistoryClickHandler, RecordingNotifier};
    use crate::models::{CheckResult, CheckStatus};

    fn entry(timestamp: &str, statuses: &[CheckStatus]) -> HistoryEntry {
        HistoryEntry {
            timestamp: timestamp.to_string(),
            results: statuses
                .iter()
                .map(|status| CheckResult {
                    url: "http://example.com".to_string(),
                    status: *status,
                    time: 0.0,
                    status_code: None,
                    timestamp: None,
                    error: None,
                })
                .collect(),
        }
    }

    fn sample_history() -> Vec<HistoryEntry> {
        vec![
            entry("2026-10-19 08:00:00", &[CheckStatus::Up]),
            entry("2026-10-19 09:00:00", &[CheckStatus::Up, CheckStatus::Timeout]),
            entry("2026-10-19 10:00:00", &[CheckStatus::Invalid]),
        ]
    }

    #[test]
    fn panel_lists_newest_first_with_positions() {
        let dom = build_history_panel(&sample_history());
        let items = dom.query_class_all(ITEM_CLASS);
        assert_eq!(items.len(), 3);

        let markers: Vec<_> = items
            .iter()
            .map(|item| dom.attribute(*item, POSITION_ATTRIBUTE).unwrap())
            .collect();
        assert_eq!(markers, vec!["0", "1", "2"]);

        let html = dom.to_html();
        let newest = html.find("10:00:00").unwrap();
        let oldest = html.find("08:00:00").unwrap();
        assert!(newest < oldest);
        assert!(html.contains(r#"<li class="list-group-item history-item" data-index="0">"#));
        assert!(html.contains("1/2 up"));
    }

    #[test]
    fn click_on_nested_badge_reports_chronological_check() {
        let history = sample_history();
        let dom = build_history_panel(&history);
        let items = dom.query_class_all(ITEM_CLASS);
        let badge = *dom.query_class_all("badge").last().unwrap();
        let top = items[0];

        let mut handler = HistoryClickHandler::attach(dom, history.len(), RecordingNotifier::default());
        handler.handle_click(&top);
        handler.handle_click(&badge);

        assert_eq!(
            handler.notifier_mut().take_messages(),
            vec!["History details for check #3", "History details for check #1"]
        );
    }

    #[test]
    fn click_on_header_is_ignored() {
        let dom = build_history_panel(&sample_history());
        let header = dom.query_class("card-header").unwrap();

        let mut handler = HistoryClickHandler::attach(dom, 3, RecordingNotifier::default());
        assert_eq!(handler.handle_click(&header), None);
        assert!(handler.notifier_mut().take_messages().is_empty());
    }

    #[test]
    fn empty_history_has_no_container() {
        let dom = build_history_panel(&[]);
        assert!(dom.query_class(CONTAINER_CLASS).is_none());
        assert!(dom.to_html().contains("No checks yet."));

        let root = dom.root();
        let mut handler = HistoryClickHandler::attach(dom, 0, RecordingNotifier::default());
        assert!(!handler.is_attached());
        assert_eq!(handler.handle_click(&root), None);
    }

    #[test]
    fn tampered_marker_degrades_to_nan() {
        let mut dom = build_history_panel(&sample_history());
        let items = dom.query_class_all(ITEM_CLASS);
        dom.set_attribute(items[1], POSITION_ATTRIBUTE, "abc");
        dom.remove_attribute(items[2], POSITION_ATTRIBUTE);

        let mut handler = HistoryClickHandler::attach(dom, 3, RecordingNotifier::default());
        handler.handle_click(&items[1]);
        handler.handle_click(&items[2]);
        assert_eq!(
            handler.notifier_mut().take_messages(),
            vec!["History details for check #NaN", "History details for check #NaN"]
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut dom = build_history_panel(&[]);
        let root = dom.root();
        dom.set_attribute(root, "title", "a\"<b>");
        assert!(dom.to_html().contains(r#"title="a&quot;&lt;b&gt;""#));
    }
}
