#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

/// Key prefix shared with the previous JavaScript editor so drafts survive the switch.
pub(crate) const DRAFT_KEY_PREFIX: &str = "smde_";

pub(crate) fn draft_key(unique_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{unique_id}")
}

/// Client-side draft persistence.
pub(crate) trait DraftStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
}

/// `window.localStorage` backed store. Storage errors (quota, private mode) are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LocalDraftStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl DraftStore for LocalDraftStore {
    fn load(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryDraftStore {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_key_uses_editor_prefix() {
        assert_eq!(draft_key("desc"), "smde_desc");
        assert_eq!(
            draft_key("0b6f2a5e-1c1f-4c3e-9b77-2f4a0f6d1a10"),
            "smde_0b6f2a5e-1c1f-4c3e-9b77-2f4a0f6d1a10"
        );
    }

    #[test]
    fn test_memory_store_overwrites() {
        let s = MemoryDraftStore::default();
        assert!(s.load("k").is_none());
        s.save("k", "one");
        s.save("k", "two");
        assert_eq!(s.load("k").as_deref(), Some("two"));
    }
}
