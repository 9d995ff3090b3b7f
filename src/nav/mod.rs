use crate::page::{Page, WebPage, ID_SEARCH};

pub(crate) const NAV_LINK_SELECTOR: &str = ".nav-link";

const LINK_ACTIVE: &[&str] = &["text-amber-600"];
const LINK_INACTIVE: &[&str] = &["text-gray-400", "hover:text-amber-600"];
/// Frame drawn around the active tab's list item.
const TAB_FRAME: &[&str] = &["-mb-px", "border-l", "border-t", "border-r", "rounded-t"];

fn set_classes(el: &web_sys::Element, add: &[&str], remove: &[&str]) {
    let classes = el.class_list();
    for c in remove {
        let _ = classes.remove_1(c);
    }
    for c in add {
        let _ = classes.add_1(c);
    }
}

fn set_link_state(link: &web_sys::Element, active: bool) {
    let parent = link.parent_element();
    if active {
        set_classes(link, LINK_ACTIVE, LINK_INACTIVE);
        if let Some(p) = &parent {
            set_classes(p, TAB_FRAME, &[]);
        }
        let _ = link.set_attribute("aria-current", "page");
    } else {
        set_classes(link, LINK_INACTIVE, LINK_ACTIVE);
        if let Some(p) = &parent {
            set_classes(p, &[], TAB_FRAME);
        }
        let _ = link.remove_attribute("aria-current");
    }
}

/// Make `link` the active event tab. The search field is cleared because a tab
/// switch reloads the unfiltered list.
pub(crate) fn change_tab(page: &WebPage, link: &web_sys::Element) {
    page.set_value_by_id(ID_SEARCH, "");

    if let Ok(links) = page.document().query_selector_all(NAV_LINK_SELECTOR) {
        for i in 0..links.length() {
            if let Some(el) = links
                .item(i)
                .and_then(|n| wasm_bindgen::JsCast::dyn_into::<web_sys::Element>(n).ok())
            {
                set_link_state(&el, false);
            }
        }
    }

    set_link_state(link, true);
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_change_tab_moves_active_state() {
        let page = WebPage::new().unwrap();
        page.document().body().unwrap().set_inner_html(
            r#"<input id="search" value="jazz">
            <ul>
              <li id="li-a" class="-mb-px border-l border-t border-r rounded-t"><a id="a" class="nav-link text-amber-600" aria-current="page">Upcoming</a></li>
              <li id="li-b"><a id="b" class="nav-link text-gray-400 hover:text-amber-600">Past</a></li>
            </ul>"#,
        );
        let b = page.by_id::<web_sys::Element>("b").unwrap();

        change_tab(&page, &b);

        let a = page.by_id::<web_sys::Element>("a").unwrap();
        let li_a = page.by_id::<web_sys::Element>("li-a").unwrap();
        let li_b = page.by_id::<web_sys::Element>("li-b").unwrap();

        assert_eq!(page.value_by_id("search").as_deref(), Some(""));
        assert!(a.class_list().contains("text-gray-400"));
        assert!(!a.class_list().contains("text-amber-600"));
        assert!(a.get_attribute("aria-current").is_none());
        assert!(!li_a.class_list().contains("border-t"));

        assert!(b.class_list().contains("text-amber-600"));
        assert!(!b.class_list().contains("text-gray-400"));
        assert_eq!(b.get_attribute("aria-current").as_deref(), Some("page"));
        assert!(li_b.class_list().contains("rounded-t"));
    }
}
