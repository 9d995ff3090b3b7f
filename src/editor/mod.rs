//! Markdown editing surface for the event description.
//!
//! The editor enhances the server-rendered `textarea[name="desc"]` in place: a
//! Leptos toolbar is mounted above it and a preview pane below it. The textarea
//! stays the source of truth, so a plain form submit always sends the current
//! text.

mod format;
mod preview;
mod toolbar;

pub(crate) use format::{insert_link, toggle_inline, History, TextState};
pub(crate) use preview::{PreviewPane, PreviewRenderer, PreviewSource};
pub(crate) use toolbar::{EditorToolbar, ToolbarItem, ToolbarSignals, DEFAULT_TOOLBAR};

use crate::api::ApiClient;
use crate::config::EditorConfig;
use crate::drafts::{AutosaveOptions, DraftCache};
use crate::error::PageError;
use crate::page::{field_selector, listen, Page, WebPage, FIELD_CACHE_KEY, FIELD_DESC, ID_EDIT_FORM};
use crate::storage::LocalDraftStore;
use format::{byte_to_utf16, utf16_to_byte};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::JsCast;

const DEFAULT_LINK_URL: &str = "https://";
const LINK_PROMPT: &str = "URL for the link:";
const PREVIEW_PANE_CLASS: &str =
    "prose max-w-none min-h-[12rem] rounded-b-md border border-input bg-background px-3 py-2";

/// Resolved editor settings for the current page.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EditorOptions {
    pub autosave: AutosaveOptions,
    pub toolbar: Vec<ToolbarItem>,
    pub spell_checker: bool,
    pub prompt_urls: bool,
    /// Status bar (word and line counts). Never shown on the event forms.
    pub status: bool,
    pub history_limit: usize,
    pub preview: PreviewSource,
}

impl EditorOptions {
    /// Build options from the page markup.
    ///
    /// Requires the description textarea and a non-blank cache key input.
    pub fn from_page<P: Page>(page: &P, config: &EditorConfig) -> Result<Self, PageError> {
        if !page.has_field(FIELD_DESC) {
            return Err(PageError::missing(field_selector(FIELD_DESC)));
        }
        let unique_id = page
            .field(FIELD_CACHE_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| PageError::missing(field_selector(FIELD_CACHE_KEY)))?;

        let preview = if page.has_element(ID_EDIT_FORM) {
            PreviewSource::Form(ID_EDIT_FORM.to_string())
        } else {
            PreviewSource::Fields
        };

        Ok(Self {
            autosave: AutosaveOptions {
                enabled: config.autosave,
                delay_ms: config.autosave_delay_ms,
                unique_id,
            },
            toolbar: toolbar_items(config.toolbar.as_deref()),
            spell_checker: false,
            prompt_urls: config.prompt_urls,
            status: false,
            history_limit: config.history_limit,
            preview,
        })
    }
}

fn toolbar_items(names: Option<&[String]>) -> Vec<ToolbarItem> {
    let Some(names) = names else {
        return DEFAULT_TOOLBAR.to_vec();
    };
    names
        .iter()
        .filter_map(|name| match ToolbarItem::from_str(name.trim()) {
            Ok(item) => Some(item),
            Err(_) => {
                warn!("editor: unknown toolbar entry {name:?}");
                None
            }
        })
        .collect()
}

/// A live editor bound to the page's description textarea.
pub(crate) struct DescriptionEditor {
    textarea: web_sys::HtmlTextAreaElement,
    pane: web_sys::HtmlElement,
    options: EditorOptions,
    drafts: DraftCache<LocalDraftStore>,
    renderer: PreviewRenderer<ApiClient, WebPage>,
    history: RefCell<History>,
    last: RefCell<TextState>,
    signals: ToolbarSignals,
}

impl DescriptionEditor {
    fn state(&self) -> TextState {
        let text = self.textarea.value();
        let start = self.textarea.selection_start().ok().flatten().unwrap_or(0);
        let end = self.textarea.selection_end().ok().flatten().unwrap_or(start);
        let range = utf16_to_byte(&text, start)..utf16_to_byte(&text, end);
        TextState::new(text, range)
    }

    fn apply(&self, state: TextState) {
        self.textarea.set_value(&state.text);
        let start = byte_to_utf16(&state.text, state.selection.start);
        let end = byte_to_utf16(&state.text, state.selection.end);
        let _ = self.textarea.set_selection_range(start, end);
        self.drafts.schedule(state.text.clone());
        *self.last.borrow_mut() = state;
    }

    fn edit(&self, f: impl FnOnce(&TextState) -> TextState) {
        let before = self.state();
        let after = f(&before);
        if after.text == before.text {
            return;
        }
        self.history.borrow_mut().record(before);
        self.sync_history();
        self.apply(after);
        let _ = self.textarea.focus();
    }

    /// Typing in the textarea.
    fn on_input(&self) {
        let current = self.state();
        let before = self.last.replace(current.clone());
        if before.text == current.text {
            return;
        }
        self.history.borrow_mut().record(before);
        self.sync_history();
        self.drafts.schedule(current.text);
    }

    fn sync_history(&self) {
        let history = self.history.borrow();
        self.signals.can_undo.set(history.can_undo());
        self.signals.can_redo.set(history.can_redo());
    }

    fn undo(&self) {
        let prev = self.history.borrow_mut().undo(self.state());
        if let Some(prev) = prev {
            self.sync_history();
            self.apply(prev);
        }
    }

    fn redo(&self) {
        let next = self.history.borrow_mut().redo(self.state());
        if let Some(next) = next {
            self.sync_history();
            self.apply(next);
        }
    }

    fn link_url(&self) -> Option<String> {
        if !self.options.prompt_urls {
            return Some(DEFAULT_LINK_URL.to_string());
        }
        web_sys::window()?
            .prompt_with_message_and_default(LINK_PROMPT, DEFAULT_LINK_URL)
            .ok()
            .flatten()
    }

    fn toggle_preview(&self) {
        if self.signals.previewing.get_untracked() {
            self.pane.set_hidden(true);
            self.textarea.set_hidden(false);
            self.signals.previewing.set(false);
            let _ = self.textarea.focus();
            return;
        }

        let pane: Rc<dyn PreviewPane> = Rc::new(web_sys::Element::from(self.pane.clone()));
        let placeholder = self.renderer.render(&self.textarea.value(), pane);
        self.pane.set_inner_html(placeholder);
        self.textarea.set_hidden(true);
        self.pane.set_hidden(false);
        self.signals.previewing.set(true);
    }

    pub fn run(&self, item: ToolbarItem) {
        if item.edits_text() && self.signals.previewing.get_untracked() {
            return;
        }
        match item {
            ToolbarItem::Bold => self.edit(|s| toggle_inline(s, "**")),
            ToolbarItem::Italic => self.edit(|s| toggle_inline(s, "*")),
            ToolbarItem::Strikethrough => self.edit(|s| toggle_inline(s, "~~")),
            ToolbarItem::Link => {
                if let Some(url) = self.link_url() {
                    self.edit(|s| insert_link(s, &url));
                }
            }
            ToolbarItem::Preview => self.toggle_preview(),
            ToolbarItem::Undo => self.undo(),
            ToolbarItem::Redo => self.redo(),
            ToolbarItem::Separator => {}
        }
    }
}

/// Enhance the description textarea. Nothing is changed when a required element is missing.
pub(crate) fn attach(
    page: Rc<WebPage>,
    api: Rc<ApiClient>,
    config: &EditorConfig,
) -> Result<Rc<DescriptionEditor>, PageError> {
    let options = EditorOptions::from_page(page.as_ref(), config)?;
    let textarea = page
        .named::<web_sys::HtmlTextAreaElement>(FIELD_DESC)
        .ok_or_else(|| PageError::missing(field_selector(FIELD_DESC)))?;

    let toolbar_host = page.create_div("")?;
    let pane = page.create_div(PREVIEW_PANE_CLASS)?;
    pane.set_hidden(true);
    textarea.before_with_node_1(&toolbar_host).map_err(PageError::dom)?;
    textarea.after_with_node_1(&pane).map_err(PageError::dom)?;

    textarea.set_spellcheck(options.spell_checker);
    let drafts = DraftCache::new(Rc::new(LocalDraftStore), &options.autosave);
    if let Some(text) = drafts.restore() {
        textarea.set_value(&text);
        log!("editor: restored draft {}", drafts.key());
    }

    let renderer = PreviewRenderer::new(api, page.clone(), options.preview.clone());
    let signals = ToolbarSignals::new();
    let initial = TextState::new(textarea.value(), 0..0);

    let editor = Rc::new(DescriptionEditor {
        textarea,
        pane,
        history: RefCell::new(History::new(options.history_limit)),
        options,
        drafts,
        renderer,
        last: RefCell::new(initial),
        signals,
    });

    let items = editor.options.toolbar.clone();
    leptos::mount::mount_to(toolbar_host, move || {
        view! { <EditorToolbar items=items signals=signals /> }
    })
    .forget();

    let handle = editor.clone();
    let pending = signals.pending;
    Effect::new(move |_| {
        let Some(item) = pending.get() else {
            return;
        };
        pending.set(None);
        handle.run(item);
    });

    let handle = editor.clone();
    listen(&editor.textarea, "input", move |_| handle.on_input())?;

    let handle = editor.clone();
    listen(&editor.textarea, "keydown", move |ev| {
        let Some(kev) = ev.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        if !(kev.ctrl_key() || kev.meta_key()) {
            return;
        }
        let Some(item) = ToolbarItem::from_shortcut(&kev.key(), kev.shift_key()) else {
            return;
        };
        if !handle.options.toolbar.contains(&item) {
            return;
        }
        ev.prevent_default();
        handle.run(item);
    })?;

    log!(
        "editor: attached (preview from {:?}, autosave {})",
        editor.renderer.source(),
        editor.drafts.key()
    );
    Ok(editor)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::storage::{draft_key, DraftStore};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn page_with(html: &str) -> Rc<WebPage> {
        let page = WebPage::new().expect("document should exist");
        page.document().body().unwrap().set_inner_html(html);
        Rc::new(page)
    }

    fn api() -> Rc<ApiClient> {
        Rc::new(ApiClient::new("http://localhost".to_string()))
    }

    #[wasm_bindgen_test]
    fn test_attach_restores_draft_and_disables_spellcheck() {
        LocalDraftStore.save(&draft_key("wasm-editor"), "saved **draft**");
        let page = page_with(
            r#"<form><input name="easymde_cache_key" value="wasm-editor"><textarea name="desc">server</textarea></form>"#,
        );
        let editor = attach(page, api(), &EditorConfig::default()).expect("should attach");
        assert_eq!(editor.textarea.value(), "saved **draft**");
        assert!(!editor.textarea.spellcheck());
        assert!(editor.pane.hidden());
    }

    #[wasm_bindgen_test]
    fn test_bold_then_undo_restores_text() {
        let page = page_with(
            r#"<input name="easymde_cache_key" value="wasm-undo"><textarea name="desc"></textarea>"#,
        );
        let editor = attach(page, api(), &EditorConfig::default()).expect("should attach");
        editor.textarea.set_value("bring snacks");
        editor.on_input();
        let _ = editor.textarea.set_selection_range(6, 12);

        editor.run(ToolbarItem::Bold);
        assert_eq!(editor.textarea.value(), "bring **snacks**");
        assert!(editor.signals.can_undo.get_untracked());
        assert!(!editor.signals.can_redo.get_untracked());

        editor.run(ToolbarItem::Undo);
        assert_eq!(editor.textarea.value(), "bring snacks");
        assert!(editor.signals.can_redo.get_untracked());

        editor.run(ToolbarItem::Redo);
        assert_eq!(editor.textarea.value(), "bring **snacks**");
        assert!(!editor.signals.can_redo.get_untracked());
    }

    #[wasm_bindgen_test]
    fn test_toolbar_buttons_do_not_submit_and_undo_starts_disabled() {
        let page = page_with(
            r#"<form><input name="easymde_cache_key" value="wasm-toolbar"><textarea name="desc"></textarea></form>"#,
        );
        attach(page.clone(), api(), &EditorConfig::default()).expect("should attach");
        let doc = page.document();
        let bold = doc.query_selector("button[data-action=bold]").unwrap().expect("bold button");
        assert_eq!(bold.get_attribute("type").as_deref(), Some("button"));
        assert!(!bold.has_attribute("disabled"));
        let undo = doc.query_selector("button[data-action=undo]").unwrap().expect("undo button");
        assert!(undo.has_attribute("disabled"));
    }

    #[wasm_bindgen_test]
    fn test_attach_fails_without_cache_key() {
        let page = page_with(r#"<textarea name="desc">x</textarea>"#);
        assert!(attach(page.clone(), api(), &EditorConfig::default()).is_err());
        assert!(page.document().query_selector("[data-name=EditorToolbar]").unwrap().is_none());
    }
}
