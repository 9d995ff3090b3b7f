use crate::storage::{draft_key, DraftStore};
use crate::util::Debouncer;
use std::rc::Rc;

/// Autosave settings for one editor instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AutosaveOptions {
    pub enabled: bool,
    pub delay_ms: u32,
    /// Per-form identifier (static id, event id or generated cache key).
    pub unique_id: String,
}

/// Debounced local draft of the description text.
///
/// The draft is read once when the editor starts and rewritten after each
/// burst of edits. It is never deleted explicitly; a later save overwrites it.
pub(crate) struct DraftCache<S: DraftStore> {
    store: Rc<S>,
    key: String,
    enabled: bool,
    debouncer: Debouncer,
}

impl<S: DraftStore + 'static> DraftCache<S> {
    pub fn new(store: Rc<S>, options: &AutosaveOptions) -> Self {
        Self {
            store,
            key: draft_key(&options.unique_id),
            enabled: options.enabled,
            debouncer: Debouncer::new(options.delay_ms),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Saved draft, if autosave is on and something non-blank was stored.
    pub fn restore(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.store
            .load(&self.key)
            .filter(|text| !text.trim().is_empty())
    }

    #[cfg(test)]
    pub fn save_now(&self, text: &str) {
        if self.enabled {
            self.store.save(&self.key, text);
        }
    }

    /// Write `text` once the user pauses typing.
    pub fn schedule(&self, text: String) {
        if !self.enabled {
            return;
        }
        let store = self.store.clone();
        let key = self.key.clone();
        self.debouncer.schedule(move || store.save(&key, &text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDraftStore;

    fn options(enabled: bool) -> AutosaveOptions {
        AutosaveOptions {
            enabled,
            delay_ms: 1000,
            unique_id: "evt-42".to_string(),
        }
    }

    #[test]
    fn test_restore_reads_saved_draft() {
        let store = Rc::new(MemoryDraftStore::default());
        let cache = DraftCache::new(store.clone(), &options(true));
        assert_eq!(cache.key(), "smde_evt-42");
        assert!(cache.restore().is_none());

        cache.save_now("Bring snacks");
        assert_eq!(cache.restore().as_deref(), Some("Bring snacks"));
    }

    #[test]
    fn test_blank_draft_is_not_restored() {
        let store = Rc::new(MemoryDraftStore::default());
        store.save("smde_evt-42", "   \n");
        let cache = DraftCache::new(store, &options(true));
        assert!(cache.restore().is_none());
    }

    #[test]
    fn test_disabled_autosave_neither_reads_nor_writes() {
        let store = Rc::new(MemoryDraftStore::default());
        store.save("smde_evt-42", "older text");
        let cache = DraftCache::new(store.clone(), &options(false));
        assert!(cache.restore().is_none());

        cache.save_now("new text");
        assert_eq!(store.load("smde_evt-42").as_deref(), Some("older text"));
    }

    #[test]
    fn test_drafts_are_keyed_per_form() {
        let store = Rc::new(MemoryDraftStore::default());
        let a = DraftCache::new(store.clone(), &options(true));
        let b = DraftCache::new(
            store.clone(),
            &AutosaveOptions {
                unique_id: "desc".to_string(),
                ..options(true)
            },
        );
        a.save_now("event draft");
        b.save_now("new event draft");
        assert_eq!(a.restore().as_deref(), Some("event draft"));
        assert_eq!(b.restore().as_deref(), Some("new event draft"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::storage::{draft_key, LocalDraftStore};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            let _ = web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(resolve.unchecked_ref(), ms);
        });
        JsFuture::from(promise).await.unwrap();
    }

    #[wasm_bindgen_test]
    async fn test_scheduled_saves_collapse_to_last_text() {
        let store = Rc::new(LocalDraftStore);
        let key = draft_key("wasm-debounce");
        store.save(&key, "");
        let cache = DraftCache::new(
            store.clone(),
            &AutosaveOptions {
                enabled: true,
                delay_ms: 20,
                unique_id: "wasm-debounce".to_string(),
            },
        );

        cache.schedule("a".to_string());
        cache.schedule("b".to_string());
        assert!(cache.debouncer.is_pending());
        assert_eq!(store.load(&key).as_deref(), Some(""));

        sleep(100).await;
        assert!(!cache.debouncer.is_pending());
        assert_eq!(store.load(&key).as_deref(), Some("b"));
    }
}
