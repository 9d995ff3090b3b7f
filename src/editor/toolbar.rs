use icons::{Bold, Eye, Italic, Link, Redo, Strikethrough, Undo};
use leptos::prelude::*;
use leptos_ui::variants;
use strum::{Display, EnumString};

variants! {
    ToolButton {
        base: "inline-flex items-center justify-center rounded-md text-muted-foreground transition-colors outline-none hover:cursor-pointer hover:bg-accent hover:text-accent-foreground focus-visible:ring-[3px] focus-visible:ring-ring/50 disabled:pointer-events-none disabled:opacity-40 [&_svg]:pointer-events-none [&_svg]:size-4 [&_svg]:shrink-0",
        variants: {
            variant: {
                Default: "",
                Toggle: "aria-pressed:bg-accent aria-pressed:text-accent-foreground",
            },
            size: {
                Default: "size-8",
                Sm: "size-7",
            }
        },
        component: {
            element: button
        }
    }
}

/// Toolbar entries, named as the server-side templates list them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ToolbarItem {
    Bold,
    Italic,
    Strikethrough,
    Link,
    #[strum(serialize = "|")]
    Separator,
    Preview,
    Undo,
    Redo,
}

pub(crate) const DEFAULT_TOOLBAR: [ToolbarItem; 8] = [
    ToolbarItem::Bold,
    ToolbarItem::Italic,
    ToolbarItem::Strikethrough,
    ToolbarItem::Link,
    ToolbarItem::Separator,
    ToolbarItem::Preview,
    ToolbarItem::Undo,
    ToolbarItem::Redo,
];

impl ToolbarItem {
    pub fn title(&self) -> &'static str {
        match self {
            ToolbarItem::Bold => "Bold (Ctrl-B)",
            ToolbarItem::Italic => "Italic (Ctrl-I)",
            ToolbarItem::Strikethrough => "Strikethrough",
            ToolbarItem::Link => "Create Link (Ctrl-K)",
            ToolbarItem::Separator => "",
            ToolbarItem::Preview => "Toggle Preview (Ctrl-P)",
            ToolbarItem::Undo => "Undo (Ctrl-Z)",
            ToolbarItem::Redo => "Redo (Ctrl-Y)",
        }
    }

    /// Whether the action edits text (and so is unavailable while previewing).
    pub fn edits_text(&self) -> bool {
        !matches!(self, ToolbarItem::Separator | ToolbarItem::Preview)
    }

    pub fn is_enabled(&self, previewing: bool, can_undo: bool, can_redo: bool) -> bool {
        if self.edits_text() && previewing {
            return false;
        }
        match self {
            ToolbarItem::Undo => can_undo,
            ToolbarItem::Redo => can_redo,
            _ => true,
        }
    }

    /// Keyboard shortcut for a `keydown` with Ctrl or Cmd held.
    pub fn from_shortcut(key: &str, shift: bool) -> Option<Self> {
        match (key.to_ascii_lowercase().as_str(), shift) {
            ("b", false) => Some(ToolbarItem::Bold),
            ("i", false) => Some(ToolbarItem::Italic),
            ("k", false) => Some(ToolbarItem::Link),
            ("p", false) => Some(ToolbarItem::Preview),
            ("z", false) => Some(ToolbarItem::Undo),
            ("z", true) | ("y", false) => Some(ToolbarItem::Redo),
            _ => None,
        }
    }
}

fn icon(item: ToolbarItem) -> AnyView {
    match item {
        ToolbarItem::Bold => view! { <Bold /> }.into_any(),
        ToolbarItem::Italic => view! { <Italic /> }.into_any(),
        ToolbarItem::Strikethrough => view! { <Strikethrough /> }.into_any(),
        ToolbarItem::Link => view! { <Link /> }.into_any(),
        ToolbarItem::Preview => view! { <Eye /> }.into_any(),
        ToolbarItem::Undo => view! { <Undo /> }.into_any(),
        ToolbarItem::Redo => view! { <Redo /> }.into_any(),
        ToolbarItem::Separator => ().into_any(),
    }
}

/// Signals shared between the toolbar and the editor that owns it.
#[derive(Clone, Copy)]
pub(crate) struct ToolbarSignals {
    /// Last clicked item; the editor consumes and clears it.
    pub pending: RwSignal<Option<ToolbarItem>>,
    pub previewing: RwSignal<bool>,
    pub can_undo: RwSignal<bool>,
    pub can_redo: RwSignal<bool>,
}

impl ToolbarSignals {
    pub fn new() -> Self {
        Self {
            pending: RwSignal::new(None),
            previewing: RwSignal::new(false),
            can_undo: RwSignal::new(false),
            can_redo: RwSignal::new(false),
        }
    }
}

/// Button row above the description textarea.
#[component]
pub fn EditorToolbar(items: Vec<ToolbarItem>, signals: ToolbarSignals) -> impl IntoView {
    view! {
        <div
            data-name="EditorToolbar"
            role="toolbar"
            class="flex flex-wrap items-center gap-0.5 rounded-t-md border border-b-0 border-input bg-background px-1 py-1"
        >
            {items
                .into_iter()
                .map(|item| {
                    if item == ToolbarItem::Separator {
                        view! { <span class="mx-1 h-5 w-px bg-border" aria-hidden="true"></span> }
                            .into_any()
                    } else {
                        view! { <ToolbarButton item=item signals=signals /> }.into_any()
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn ToolbarButton(item: ToolbarItem, signals: ToolbarSignals) -> impl IntoView {
    let variant = if item == ToolbarItem::Preview {
        ToolButtonVariant::Toggle
    } else {
        ToolButtonVariant::Default
    };
    let ToolbarSignals {
        pending,
        previewing,
        can_undo,
        can_redo,
    } = signals;

    view! {
        <ToolButton
            variant=variant
            size=ToolButtonSize::Default
            attr:r#type="button"
            attr:title=item.title()
            attr:aria-label=item.title()
            attr:data-action=item.to_string()
            attr:aria-pressed=move || (item == ToolbarItem::Preview && previewing.get()).to_string()
            attr:disabled=move || !item.is_enabled(previewing.get(), can_undo.get(), can_redo.get())
            on:click=move |_| pending.set(Some(item))
        >
            {icon(item)}
        </ToolButton>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_toolbar_names_roundtrip() {
        let names: Vec<String> = DEFAULT_TOOLBAR.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            names,
            vec!["bold", "italic", "strikethrough", "link", "|", "preview", "undo", "redo"]
        );
        assert_eq!(ToolbarItem::from_str("|").unwrap(), ToolbarItem::Separator);
        assert!(ToolbarItem::from_str("image").is_err());
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(ToolbarItem::from_shortcut("B", false), Some(ToolbarItem::Bold));
        assert_eq!(ToolbarItem::from_shortcut("z", true), Some(ToolbarItem::Redo));
        assert_eq!(ToolbarItem::from_shortcut("y", false), Some(ToolbarItem::Redo));
        assert_eq!(ToolbarItem::from_shortcut("s", false), None);
    }

    #[test]
    fn test_preview_stays_enabled_while_previewing() {
        assert!(!ToolbarItem::Preview.edits_text());
        assert!(ToolbarItem::Preview.is_enabled(true, false, false));
        assert!(!ToolbarItem::Bold.is_enabled(true, true, true));
    }

    #[test]
    fn test_undo_redo_follow_history() {
        assert!(!ToolbarItem::Undo.is_enabled(false, false, true));
        assert!(ToolbarItem::Undo.is_enabled(false, true, false));
        assert!(!ToolbarItem::Redo.is_enabled(false, true, false));
        assert!(ToolbarItem::Redo.is_enabled(false, false, true));
        assert!(!ToolbarItem::Redo.is_enabled(true, true, true));
        assert!(ToolbarItem::Link.is_enabled(false, false, false));
    }
}
