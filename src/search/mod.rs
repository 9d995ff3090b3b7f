use crate::error::PageError;
use crate::highlight::highlight_subtree;
use crate::page::{listen, Page, WebPage, ID_EVENT_LIST, ID_LOAD_MORE, ID_SEARCH};
use leptos::logging::warn;
use wasm_bindgen::JsCast;

/// Partial page update event emitted by htmx once swapped content has settled.
pub(crate) const AFTER_SETTLE_EVENT: &str = "htmx:afterSettle";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SettleKind {
    /// Whole result list replaced (tab switch or new search query).
    Reload,
    /// Infinite scroll appended more events.
    Append,
}

impl SettleKind {
    pub fn from_target_id(id: &str) -> Option<Self> {
        match id {
            ID_EVENT_LIST => Some(Self::Reload),
            ID_LOAD_MORE => Some(Self::Append),
            _ => None,
        }
    }
}

/// React to settled content swapped into `target_id`.
///
/// `mark` highlights the given term inside the inserted subtree and returns how
/// many matches it produced. Returns `None` for unrelated swaps.
pub(crate) fn handle_settle<P: Page>(
    page: &P,
    target_id: &str,
    mark: impl FnOnce(&str) -> usize,
) -> Option<usize> {
    let kind = SettleKind::from_target_id(target_id)?;
    let term = page.value_by_id(ID_SEARCH).unwrap_or_default();
    let count = mark(&term);
    if kind == SettleKind::Reload {
        page.scroll_to_top();
    }
    Some(count)
}

/// Set the search field and notify its listeners once, e.g. when a tag is clicked.
pub(crate) fn set_search<P: Page>(page: &P, value: &str) -> bool {
    if !page.set_value_by_id(ID_SEARCH, value) {
        warn!("setSearch: #{ID_SEARCH} not found");
        return false;
    }
    page.dispatch_change(ID_SEARCH)
}

fn settle_detail(ev: &web_sys::Event) -> Option<(String, web_sys::Element)> {
    let detail = ev.dyn_ref::<web_sys::CustomEvent>()?.detail();
    let target = js_sys::Reflect::get(&detail, &"target".into()).ok()?;
    let id = js_sys::Reflect::get(&target, &"id".into()).ok()?.as_string()?;
    let elt = js_sys::Reflect::get(&detail, &"elt".into())
        .ok()?
        .dyn_into::<web_sys::Element>()
        .ok()?;
    Some((id, elt))
}

/// Listen for settled swaps on `#event-list` and highlight the search term in them.
pub(crate) fn attach(page: &WebPage) -> Result<(), PageError> {
    if !page.has_element(ID_SEARCH) {
        return Err(PageError::missing(format!("#{ID_SEARCH}")));
    }
    let event_list = page
        .by_id::<web_sys::Element>(ID_EVENT_LIST)
        .ok_or_else(|| PageError::missing(format!("#{ID_EVENT_LIST}")))?;

    let page = page.clone();
    listen(&event_list, AFTER_SETTLE_EVENT, move |ev| {
        let Some((target_id, elt)) = settle_detail(&ev) else {
            return;
        };
        handle_settle(&page, &target_id, |term| highlight_subtree(&elt, term).len());
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::FakePage;
    use std::cell::RefCell;

    #[test]
    fn test_settle_kind_from_target_id() {
        assert_eq!(SettleKind::from_target_id("event-list"), Some(SettleKind::Reload));
        assert_eq!(SettleKind::from_target_id("load-more"), Some(SettleKind::Append));
        assert_eq!(SettleKind::from_target_id("alert"), None);
    }

    #[test]
    fn test_reload_highlights_and_scrolls_to_top() {
        let page = FakePage::default().with_element(ID_SEARCH, "\"jazz\"");
        let seen = RefCell::new(Vec::new());

        let out = handle_settle(&page, "event-list", |term| {
            seen.borrow_mut().push(term.to_string());
            2
        });

        assert_eq!(out, Some(2));
        assert_eq!(*seen.borrow(), vec!["\"jazz\"".to_string()]);
        assert_eq!(page.scrolls.get(), 1);
    }

    #[test]
    fn test_append_highlights_without_scrolling() {
        let page = FakePage::default().with_element(ID_SEARCH, "jazz");
        let out = handle_settle(&page, "load-more", |_| 1);
        assert_eq!(out, Some(1));
        assert_eq!(page.scrolls.get(), 0);
    }

    #[test]
    fn test_unrelated_swap_is_ignored() {
        let page = FakePage::default().with_element(ID_SEARCH, "jazz");
        let mut called = false;
        let out = handle_settle(&page, "alert", |_| {
            called = true;
            0
        });
        assert_eq!(out, None);
        assert!(!called);
        assert_eq!(page.scrolls.get(), 0);
    }

    #[test]
    fn test_set_search_updates_value_and_notifies_once() {
        let page = FakePage::default().with_element(ID_SEARCH, "");
        assert!(set_search(&page, "cats"));
        assert_eq!(page.value_by_id(ID_SEARCH).as_deref(), Some("cats"));
        assert_eq!(*page.changes.borrow(), vec![ID_SEARCH.to_string()]);
    }

    #[test]
    fn test_set_search_without_field_does_nothing() {
        let page = FakePage::default();
        assert!(!set_search(&page, "cats"));
        assert!(page.changes.borrow().is_empty());
    }
}
