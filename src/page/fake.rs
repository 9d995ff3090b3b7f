use super::Page;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory page used by unit tests.
#[derive(Default)]
pub(crate) struct FakePage {
    pub fields: RefCell<HashMap<String, String>>,
    pub ids: RefCell<HashMap<String, String>>,
    pub forms: RefCell<HashMap<String, Vec<(String, String)>>>,
    pub busy_log: RefCell<Vec<(String, bool)>>,
    pub alerts: RefCell<Vec<String>>,
    pub changes: RefCell<Vec<String>>,
    pub scrolls: Cell<u32>,
    pub timezone: RefCell<Option<String>>,
}

impl FakePage {
    pub fn with_fields(fields: &[(&str, &str)]) -> Self {
        let page = Self::default();
        for (k, v) in fields {
            page.fields.borrow_mut().insert(k.to_string(), v.to_string());
        }
        page
    }

    pub fn with_element(self, id: &str, value: &str) -> Self {
        self.ids.borrow_mut().insert(id.to_string(), value.to_string());
        self
    }

    pub fn with_form(self, id: &str, fields: &[(&str, &str)]) -> Self {
        let pairs = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.forms.borrow_mut().insert(id.to_string(), pairs);
        self.ids.borrow_mut().insert(id.to_string(), String::new());
        self
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy_log
            .borrow()
            .iter()
            .rev()
            .find(|(x, _)| x == id)
            .map(|(_, busy)| *busy)
            .unwrap_or(false)
    }
}

impl Page for FakePage {
    fn field(&self, name: &str) -> Option<String> {
        self.fields.borrow().get(name).cloned()
    }

    fn set_field(&self, name: &str, value: &str) -> bool {
        match self.fields.borrow_mut().get_mut(name) {
            Some(v) => {
                *v = value.to_string();
                true
            }
            None => false,
        }
    }

    fn has_element(&self, id: &str) -> bool {
        self.ids.borrow().contains_key(id)
    }

    fn value_by_id(&self, id: &str) -> Option<String> {
        self.ids.borrow().get(id).cloned()
    }

    fn set_value_by_id(&self, id: &str, value: &str) -> bool {
        match self.ids.borrow_mut().get_mut(id) {
            Some(v) => {
                *v = value.to_string();
                true
            }
            None => false,
        }
    }

    fn dispatch_change(&self, id: &str) -> bool {
        if !self.has_element(id) {
            return false;
        }
        self.changes.borrow_mut().push(id.to_string());
        true
    }

    fn form_fields(&self, form_id: &str) -> Option<Vec<(String, String)>> {
        self.forms.borrow().get(form_id).cloned()
    }

    fn set_busy(&self, id: &str, busy: bool) {
        self.busy_log.borrow_mut().push((id.to_string(), busy));
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn scroll_to_top(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }

    fn client_timezone(&self) -> Option<String> {
        self.timezone.borrow().clone()
    }
}
