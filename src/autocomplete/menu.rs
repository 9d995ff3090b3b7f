use super::{step_active, Suggestions};
use crate::geocode::PlaceCandidate;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::tw_merge;

mod components {
    use super::*;
    clx! {MenuPanel, div, "absolute left-0 right-0 top-1 z-50 rounded-md border border-input bg-popover p-1 text-popover-foreground shadow-md"}
    clx! {MenuNotice, p, "px-3 py-1.5 text-sm"}
}

use components::*;

const ITEM_CLASS: &str = "cursor-pointer truncate rounded-sm px-3 py-1.5 text-sm";
const ITEM_ACTIVE_CLASS: &str = "bg-accent text-accent-foreground";

/// Reactive state shared by the location input listeners and [`LocationMenu`].
#[derive(Clone, Copy)]
pub(crate) struct MenuState {
    pub items: RwSignal<Vec<PlaceCandidate>>,
    pub error: RwSignal<Option<String>>,
    pub open: RwSignal<bool>,
    pub active: RwSignal<Option<usize>>,
    /// Last chosen candidate; set on click or Enter.
    pub picked: RwSignal<Option<PlaceCandidate>>,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(vec![]),
            error: RwSignal::new(None),
            open: RwSignal::new(false),
            active: RwSignal::new(None),
            picked: RwSignal::new(None),
        }
    }

    pub fn show(&self, suggestions: Suggestions) {
        let open = !suggestions.items.is_empty() || suggestions.error.is_some();
        self.items.set(suggestions.items);
        self.error.set(suggestions.error);
        self.active.set(None);
        self.open.set(open);
    }

    pub fn close(&self) {
        self.open.set(false);
        self.active.set(None);
    }

    pub fn step(&self, forward: bool) {
        if !self.open.get_untracked() {
            return;
        }
        let len = self.items.with_untracked(Vec::len);
        self.active.set(step_active(self.active.get_untracked(), len, forward));
    }

    pub fn pick(&self, candidate: PlaceCandidate) {
        self.picked.set(Some(candidate));
        self.close();
    }

    /// Pick the highlighted row. Returns false when nothing is highlighted.
    pub fn pick_active(&self) -> bool {
        if !self.open.get_untracked() {
            return false;
        }
        let Some(i) = self.active.get_untracked() else {
            return false;
        };
        let Some(candidate) = self.items.with_untracked(|items| items.get(i).cloned()) else {
            return false;
        };
        self.pick(candidate);
        true
    }
}

/// Suggestion list rendered under the location input.
#[component]
pub fn LocationMenu(state: MenuState) -> impl IntoView {
    view! {
        <Show when=move || state.open.get() fallback=|| ().into_view()>
            <MenuPanel attr:data-name="LocationMenu">
                {move || {
                    state.error.get().map(|e| view! {
                        <MenuNotice class="text-destructive" attr:role="alert">{e}</MenuNotice>
                    })
                }}
                <ul role="listbox">
                    {move || {
                        state
                            .items
                            .get()
                            .into_iter()
                            .enumerate()
                            .map(|(i, candidate)| {
                                let selected = move || state.active.get() == Some(i);
                                let label = candidate.label.clone();
                                view! {
                                    <li
                                        role="option"
                                        aria-selected=move || selected().to_string()
                                        class=move || tw_merge!(ITEM_CLASS, if selected() { ITEM_ACTIVE_CLASS } else { "" })
                                        on:mouseenter=move |_| state.active.set(Some(i))
                                        on:mousedown=move |ev: web_sys::MouseEvent| {
                                            // Keep focus in the input so blur does not close the menu first.
                                            ev.prevent_default();
                                            state.pick(candidate.clone());
                                        }
                                    >
                                        {label}
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </MenuPanel>
        </Show>
    }
}
