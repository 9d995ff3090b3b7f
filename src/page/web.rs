use super::{field_selector, Page, FIELD_USER_TIMEZONE};
use crate::error::PageError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Hides an element without removing it from layout (matches the server markup).
const HIDDEN_CLASS: &str = "opacity-0";

/// [`Page`] backed by the live `document`.
#[derive(Clone)]
pub(crate) struct WebPage {
    document: web_sys::Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn named<T: JsCast>(&self, name: &str) -> Option<T> {
        self.document
            .query_selector(&field_selector(name))
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<T>().ok())
    }

    pub fn by_id<T: JsCast>(&self, id: &str) -> Option<T> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<T>().ok())
    }

    /// Detached `<div>` with `class`, ready to host a mounted component.
    pub fn create_div(&self, class: &str) -> Result<web_sys::HtmlElement, PageError> {
        let el = self
            .document
            .create_element("div")
            .map_err(PageError::dom)?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| PageError::Dom("div is not an HtmlElement".to_string()))?;
        el.set_class_name(class);
        Ok(el)
    }

    /// Run `f` once the document has been parsed.
    pub fn on_ready(&self, f: impl FnOnce() + 'static) {
        if self.document.ready_state() != "loading" {
            f();
            return;
        }

        let cb = Closure::once_into_js(f);
        let _ = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", cb.as_ref().unchecked_ref());
    }
}

/// Register `f` for `event` on `target`. The listener lives for the page lifetime.
pub(crate) fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    f: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), PageError> {
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
    target
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
        .map_err(PageError::dom)?;
    cb.forget();
    Ok(())
}

fn control_value(el: &web_sys::Element) -> Option<String> {
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    None
}

fn set_control_value(el: &web_sys::Element, value: &str) -> bool {
    if let Some(input) = el.dyn_ref::<web_sys::HtmlInputElement>() {
        input.set_value(value);
        return true;
    }
    if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        area.set_value(value);
        return true;
    }
    false
}

fn form_data_pairs(form: &web_sys::HtmlFormElement) -> Option<Vec<(String, String)>> {
    let data = web_sys::FormData::new_with_form(form).ok()?;
    let iter = js_sys::try_iter(&data).ok().flatten()?;

    let mut out = Vec::new();
    for entry in iter {
        let Ok(entry) = entry else {
            continue;
        };
        let pair = js_sys::Array::from(&entry);
        // File inputs yield Blob values; those never go into a preview.
        if let (Some(k), Some(v)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            out.push((k, v));
        }
    }
    Some(out)
}

impl Page for WebPage {
    fn field(&self, name: &str) -> Option<String> {
        let el = self.named::<web_sys::Element>(name)?;
        control_value(&el)
    }

    fn set_field(&self, name: &str, value: &str) -> bool {
        self.named::<web_sys::Element>(name)
            .map(|el| set_control_value(&el, value))
            .unwrap_or(false)
    }

    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn value_by_id(&self, id: &str) -> Option<String> {
        let el = self.document.get_element_by_id(id)?;
        control_value(&el)
    }

    fn set_value_by_id(&self, id: &str, value: &str) -> bool {
        self.document
            .get_element_by_id(id)
            .map(|el| set_control_value(&el, value))
            .unwrap_or(false)
    }

    fn dispatch_change(&self, id: &str) -> bool {
        let Some(el) = self.document.get_element_by_id(id) else {
            return false;
        };
        let Ok(ev) = web_sys::Event::new("change") else {
            return false;
        };
        el.dispatch_event(&ev).is_ok()
    }

    fn form_fields(&self, form_id: &str) -> Option<Vec<(String, String)>> {
        let form = self.by_id::<web_sys::HtmlFormElement>(form_id)?;
        form_data_pairs(&form)
    }

    fn set_busy(&self, id: &str, busy: bool) {
        let Some(el) = self.document.get_element_by_id(id) else {
            return;
        };
        let classes = el.class_list();
        let _ = if busy {
            classes.remove_1(HIDDEN_CLASS)
        } else {
            classes.add_1(HIDDEN_CLASS)
        };
    }

    fn alert(&self, message: &str) {
        if let Some(win) = web_sys::window() {
            let _ = win.alert_with_message(message);
        }
    }

    fn scroll_to_top(&self) {
        let Some(win) = web_sys::window() else {
            return;
        };
        let opts = web_sys::ScrollToOptions::new();
        opts.set_top(0.0);
        opts.set_behavior(web_sys::ScrollBehavior::Smooth);
        win.scroll_to_with_scroll_to_options(&opts);
    }

    fn client_timezone(&self) -> Option<String> {
        let format = js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &js_sys::Object::new());
        let resolved = format.resolved_options();
        js_sys::Reflect::get(&resolved, &"timeZone".into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|tz| !tz.is_empty())
            .or_else(|| self.field(FIELD_USER_TIMEZONE).filter(|tz| !tz.is_empty()))
    }
}
