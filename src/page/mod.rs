mod web;

#[cfg(test)]
pub(crate) mod fake;

pub(crate) use web::{listen, WebPage};

// Form control names rendered by the event forms.
pub(crate) const FIELD_DESC: &str = "desc";
pub(crate) const FIELD_TITLE: &str = "title";
pub(crate) const FIELD_CSRF: &str = "csrf";
pub(crate) const FIELD_CACHE_KEY: &str = "easymde_cache_key";
pub(crate) const FIELD_LOCATION: &str = "location";
pub(crate) const FIELD_LATITUDE: &str = "latitude";
pub(crate) const FIELD_LONGITUDE: &str = "longitude";
pub(crate) const FIELD_TIMEZONE_OFFSET: &str = "timezone_offset";
pub(crate) const FIELD_USER_TIMEZONE: &str = "user_timezone";

// Element ids.
pub(crate) const ID_EDIT_FORM: &str = "edit-form";
pub(crate) const ID_SEARCH: &str = "search";
pub(crate) const ID_EVENT_LIST: &str = "event-list";
pub(crate) const ID_LOAD_MORE: &str = "load-more";
pub(crate) const ID_LOCATION_SPINNER: &str = "location-spinner";

pub(crate) fn field_selector(name: &str) -> String {
    format!("[name=\"{name}\"]")
}

/// Access to the server-rendered page.
///
/// Behaviors never query `document` directly; they go through this so tests can
/// substitute an in-memory page.
pub(crate) trait Page {
    /// Value of the first form control with `name`.
    fn field(&self, name: &str) -> Option<String>;

    /// Returns false when no such control exists.
    fn set_field(&self, name: &str, value: &str) -> bool;

    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    fn has_element(&self, id: &str) -> bool;

    /// Value of the form control with `id`.
    fn value_by_id(&self, id: &str) -> Option<String>;

    fn set_value_by_id(&self, id: &str, value: &str) -> bool;

    /// Fire a `change` event on the element with `id`.
    fn dispatch_change(&self, id: &str) -> bool;

    /// All successful controls of the form with `id`, in document order.
    fn form_fields(&self, form_id: &str) -> Option<Vec<(String, String)>>;

    /// Show or hide a loading indicator.
    fn set_busy(&self, id: &str, busy: bool);

    fn alert(&self, message: &str);

    fn scroll_to_top(&self);

    /// IANA timezone name of the browser, e.g. `Europe/Tallinn`.
    fn client_timezone(&self) -> Option<String>;
}
