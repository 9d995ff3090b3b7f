mod api;
mod autocomplete;
mod config;
mod drafts;
mod editor;
mod error;
mod geocode;
mod highlight;
mod nav;
mod page;
mod search;
mod storage;
mod util;

use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::page::WebPage;
use leptos::logging::{log, warn};
use std::rc::Rc;
use wasm_bindgen::prelude::wasm_bindgen;

/// Attach every behavior the current page has markup for.
///
/// Each behavior validates its own elements; one that cannot attach leaves the
/// others untouched.
fn attach_all(page: Rc<WebPage>) {
    let config = EnvConfig::new();
    let api = Rc::new(ApiClient::new(config.api_url()));

    if let Err(e) = editor::attach(page.clone(), api.clone(), &config.editor) {
        log!("description editor not attached: {e}");
    }
    if let Err(e) = autocomplete::attach(page.clone(), api, &config.autocomplete) {
        log!("location autocomplete not attached: {e}");
    }
    if let Err(e) = search::attach(&page) {
        log!("search highlighting not attached: {e}");
    }
}

/// Set the search field from page scripts (e.g. a clicked tag) and notify its listeners.
#[wasm_bindgen(js_name = setSearch)]
pub fn set_search(value: &str) {
    let Some(page) = WebPage::new() else {
        warn!("setSearch: no document");
        return;
    };
    search::set_search(&page, value);
}

/// Switch the active event tab; called from the tab links' `onclick`.
#[wasm_bindgen(js_name = changeTab)]
pub fn change_tab(link: web_sys::Element) {
    let Some(page) = WebPage::new() else {
        warn!("changeTab: no document");
        return;
    };
    nav::change_tab(&page, &link);
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let Some(page) = WebPage::new() else {
        return;
    };
    let page = Rc::new(page);
    let ready = page.clone();
    page.on_ready(move || attach_all(ready));
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_exported_set_search_updates_field() {
        let page = WebPage::new().unwrap();
        page.document()
            .body()
            .unwrap()
            .set_inner_html(r#"<input id="search" value="">"#);
        set_search("cats");
        let input = page.by_id::<web_sys::HtmlInputElement>("search").unwrap();
        assert_eq!(input.value(), "cats");
    }

    #[wasm_bindgen_test]
    fn test_attach_all_tolerates_bare_page() {
        let page = WebPage::new().unwrap();
        page.document().body().unwrap().set_inner_html("<p>nothing to enhance</p>");
        attach_all(Rc::new(page.clone()));
        let body = page.document().body().unwrap();
        assert_eq!(body.inner_html(), "<p>nothing to enhance</p>");
    }
}
