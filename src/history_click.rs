//! Click handling for the rendered history list.
//!
//! A single delegated handler sits on the flush list group. A click on any
//! history item (or anything nested inside one) maps the item's position
//! marker to a check number and hands the text to a [`Notifier`].

use std::fmt;
use tracing::debug;

pub const CONTAINER_CLASS: &str = "list-group-flush";
pub const ITEM_CLASS: &str = "history-item";
pub const POSITION_ATTRIBUTE: &str = "data-index";

/// Where clickable history items live.
pub trait ClickableItemSource {
    type Container;
    type Target;

    fn find_container(&self) -> Option<Self::Container>;

    /// Nearest ancestor-or-self of `target` inside `container` that is a
    /// history item.
    fn find_item(&self, container: &Self::Container, target: &Self::Target) -> Option<HistoryItem>;
}

/// Receives the text shown for a qualifying click.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

/// Collects notifications instead of showing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Vec<String>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub position_marker: Option<String>,
}

/// Check numbers follow double-precision arithmetic, so oversized markers
/// still produce a (rounded) finite number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckNumber {
    Value(f64),
    NotANumber,
}

impl CheckNumber {
    pub fn from_marker(history_length: usize, marker: Option<&str>) -> Self {
        match parse_position_marker(marker) {
            Some(position) => Self::Value(history_length as f64 - position),
            None => Self::NotANumber,
        }
    }
}

impl fmt::Display for CheckNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NotANumber => f.write_str("NaN"),
            Self::Value(value) if value == 0.0 => f.write_str("0"),
            Self::Value(value) if value.abs() < 1e21 => write!(f, "{value:.0}"),
            Self::Value(value) => {
                let scientific = format!("{value:e}");
                match scientific.split_once('e') {
                    Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                        write!(f, "{mantissa}e+{exponent}")
                    }
                    _ => f.write_str(&scientific),
                }
            }
        }
    }
}

/// Leading-integer parse: optional whitespace and sign, then as many decimal
/// digits as are present. Trailing garbage is ignored; no digits at all
/// yields `None`.
pub fn parse_position_marker(marker: Option<&str>) -> Option<f64> {
    let text = marker?.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    let value: f64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

pub fn details_message(check_number: CheckNumber) -> String {
    format!("History details for check #{check_number}")
}

pub struct HistoryClickHandler<S: ClickableItemSource, N> {
    source: S,
    container: Option<S::Container>,
    history_length: usize,
    notifier: N,
}

impl<S: ClickableItemSource, N: Notifier> HistoryClickHandler<S, N> {
    /// Looks the container up once. Without one the handler stays inert.
    pub fn attach(source: S, history_length: usize, notifier: N) -> Self {
        let container = source.find_container();
        if container.is_none() {
            debug!("no history container found; click handler inactive");
        }
        Self {
            source,
            container,
            history_length,
            notifier,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.container.is_some()
    }

    pub fn handle_click(&mut self, target: &S::Target) -> Option<CheckNumber> {
        let container = self.container.as_ref()?;
        let item = self.source.find_item(container, target)?;
        let check_number =
            CheckNumber::from_marker(self.history_length, item.position_marker.as_deref());
        self.notifier.notify(&details_message(check_number));
        Some(check_number)
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Targets are item ids; `outside` never resolves to an item.
    struct FakeList {
        has_container: bool,
        markers: HashMap<&'static str, Option<&'static str>>,
    }

    impl FakeList {
        fn new(markers: &[(&'static str, Option<&'static str>)]) -> Self {
            Self {
                has_container: true,
                markers: markers.iter().copied().collect(),
            }
        }
    }

    impl ClickableItemSource for FakeList {
        type Container = ();
        type Target = &'static str;

        fn find_container(&self) -> Option<()> {
            self.has_container.then_some(())
        }

        fn find_item(&self, _container: &(), target: &&'static str) -> Option<HistoryItem> {
            self.markers.get(target).map(|marker| HistoryItem {
                position_marker: marker.map(str::to_string),
            })
        }
    }

    fn handler(
        length: usize,
        markers: &[(&'static str, Option<&'static str>)],
    ) -> HistoryClickHandler<FakeList, RecordingNotifier> {
        HistoryClickHandler::attach(FakeList::new(markers), length, RecordingNotifier::default())
    }

    #[test]
    fn click_maps_marker_to_check_number() {
        let mut h = handler(5, &[("first", Some("0")), ("last", Some("4")), ("bad", Some("abc"))]);

        assert_eq!(h.handle_click(&"first"), Some(CheckNumber::Value(5.0)));
        assert_eq!(h.handle_click(&"last"), Some(CheckNumber::Value(1.0)));
        assert_eq!(h.handle_click(&"bad"), Some(CheckNumber::NotANumber));

        assert_eq!(
            h.notifier_mut().take_messages(),
            vec![
                "History details for check #5",
                "History details for check #1",
                "History details for check #NaN",
            ]
        );
    }

    #[test]
    fn every_marker_up_to_length_counts_down() {
        let length = 7;
        for position in 0..=length {
            let marker = position.to_string();
            let number = CheckNumber::from_marker(length, Some(&marker));
            assert_eq!(number, CheckNumber::Value((length - position) as f64));
        }
    }

    #[test]
    fn empty_history_negates_position() {
        let mut h = handler(0, &[("item", Some("3"))]);
        h.handle_click(&"item");
        assert_eq!(h.notifier_mut().take_messages(), vec!["History details for check #-3"]);
    }

    #[test]
    fn click_outside_items_is_ignored() {
        let mut h = handler(2, &[("item", Some("0"))]);
        assert_eq!(h.handle_click(&"outside"), None);
        assert!(h.notifier_mut().take_messages().is_empty());
    }

    #[test]
    fn missing_container_never_notifies() {
        let mut list = FakeList::new(&[("item", Some("0"))]);
        list.has_container = false;
        let mut h = HistoryClickHandler::attach(list, 3, RecordingNotifier::default());

        assert!(!h.is_attached());
        assert_eq!(h.handle_click(&"item"), None);
        assert_eq!(h.handle_click(&"item"), None);
        assert!(h.notifier_mut().take_messages().is_empty());
    }

    #[test]
    fn repeated_clicks_notify_each_time() {
        let mut h = handler(3, &[("item", Some("1"))]);
        h.handle_click(&"item");
        h.handle_click(&"item");
        assert_eq!(
            h.notifier_mut().take_messages(),
            vec!["History details for check #2", "History details for check #2"]
        );
    }

    #[test]
    fn missing_marker_is_not_a_number() {
        let mut h = handler(4, &[("item", None)]);
        assert_eq!(h.handle_click(&"item"), Some(CheckNumber::NotANumber));
    }

    #[test]
    fn closure_works_as_notifier() {
        let mut seen = Vec::new();
        {
            let mut h = HistoryClickHandler::attach(
                FakeList::new(&[("item", Some("2"))]),
                2,
                |message: &str| seen.push(message.to_string()),
            );
            h.handle_click(&"item");
        }
        assert_eq!(seen, vec!["History details for check #0"]);
    }

    #[test]
    fn marker_parsing_takes_leading_integer() {
        assert_eq!(parse_position_marker(Some("12")), Some(12.0));
        assert_eq!(parse_position_marker(Some("  7")), Some(7.0));
        assert_eq!(parse_position_marker(Some("3px")), Some(3.0));
        assert_eq!(parse_position_marker(Some("+4")), Some(4.0));
        assert_eq!(parse_position_marker(Some("-2")), Some(-2.0));
        assert_eq!(parse_position_marker(Some("")), None);
        assert_eq!(parse_position_marker(Some("-")), None);
        assert_eq!(parse_position_marker(Some("x1")), None);
        assert_eq!(parse_position_marker(None), None);
        assert_eq!(parse_position_marker(Some("99999999999999999999")), Some(1e20));
    }

    #[test]
    fn oversized_markers_stay_finite() {
        let huge = CheckNumber::from_marker(5, Some("99999999999999999999"));
        assert_eq!(huge, CheckNumber::Value(-1e20));
        assert_eq!(
            details_message(huge),
            "History details for check #-100000000000000000000"
        );

        let enormous = CheckNumber::from_marker(0, Some("1000000000000000000000000"));
        assert_eq!(details_message(enormous), "History details for check #-1e+24");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(CheckNumber::from_marker(0, Some("-0")).to_string(), "0");
        assert_eq!(CheckNumber::from_marker(0, Some("0")).to_string(), "0");
    }
}
