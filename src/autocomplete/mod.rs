//! Place search for the event location field.

mod menu;

pub(crate) use menu::{LocationMenu, MenuState};

use crate::api::{ApiClient, GetTimezoneRequest, TimezoneBackend};
use crate::config::AutocompleteConfig;
use crate::error::PageError;
use crate::geocode::{OpenStreetMapProvider, PlaceCandidate, PlaceProvider};
use crate::page::{
    field_selector, listen, Page, WebPage, FIELD_LATITUDE, FIELD_LOCATION, FIELD_LONGITUDE,
    FIELD_TIMEZONE_OFFSET, ID_LOCATION_SPINNER,
};
use crate::util::{Debouncer, RequestSeq};
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;

pub(crate) const LOCATION_SEARCH_FAILED: &str = "Location search failed";
pub(crate) const TIMEZONE_FAILED: &str = "Unable to resolve the timezone for this location";

/// Trimmed query, or `None` when it is too short to search.
pub(crate) fn normalize_query(raw: &str, min_length: usize) -> Option<String> {
    let query = raw.trim();
    if query.is_empty() || query.chars().count() < min_length {
        return None;
    }
    Some(query.to_string())
}

/// Menu contents for one query.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Suggestions {
    pub items: Vec<PlaceCandidate>,
    pub error: Option<String>,
}

/// Next highlighted row for an arrow key; moving past either end returns to the input.
pub(crate) fn step_active(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (current, forward) {
        (None, true) => Some(0),
        (None, false) => Some(len - 1),
        (Some(i), true) if i + 1 < len => Some(i + 1),
        (Some(i), false) if i > 0 => Some(i - 1),
        _ => None,
    }
}

pub(crate) struct LocationAutocomplete<P, G, B> {
    page: Rc<P>,
    provider: Rc<G>,
    backend: Rc<B>,
    config: AutocompleteConfig,
    resolve_timezone: bool,
    seq: RequestSeq,
    select_seq: RequestSeq,
    in_flight: Cell<u32>,
}

impl<P: Page, G: PlaceProvider, B: TimezoneBackend> LocationAutocomplete<P, G, B> {
    pub fn new(
        page: Rc<P>,
        provider: Rc<G>,
        backend: Rc<B>,
        config: AutocompleteConfig,
    ) -> Result<Self, PageError> {
        for name in [FIELD_LOCATION, FIELD_LATITUDE, FIELD_LONGITUDE] {
            if !page.has_field(name) {
                return Err(PageError::missing(field_selector(name)));
            }
        }

        let resolve_timezone = config.resolve_timezone && page.has_field(FIELD_TIMEZONE_OFFSET);
        if config.resolve_timezone && !resolve_timezone {
            warn!("autocomplete: no {} field, offsets are not resolved", field_selector(FIELD_TIMEZONE_OFFSET));
        }

        Ok(Self {
            page,
            provider,
            backend,
            config,
            resolve_timezone,
            seq: RequestSeq::default(),
            select_seq: RequestSeq::default(),
            in_flight: Cell::new(0),
        })
    }

    fn busy(&self, started: bool) {
        let n = if started {
            self.in_flight.get() + 1
        } else {
            self.in_flight.get().saturating_sub(1)
        };
        self.in_flight.set(n);
        self.page.set_busy(ID_LOCATION_SPINNER, n > 0);
    }

    /// Search for `raw`.
    ///
    /// Returns `None` when a newer query started while this one was in flight.
    /// Short queries resolve to an empty list without calling the provider.
    pub async fn suggest(&self, raw: &str) -> Option<Suggestions> {
        let ticket = self.seq.next();
        let Some(query) = normalize_query(raw, self.config.min_length) else {
            return Some(Suggestions::default());
        };

        self.busy(true);
        let result = self.provider.search(&query, self.config.limit).await;
        self.busy(false);

        if !self.seq.is_latest(ticket) {
            return None;
        }

        match result {
            Ok(items) => Some(Suggestions { items, error: None }),
            Err(e) => {
                error!("autocomplete: search for {query:?} failed ({}): {e}", e.kind);
                Some(Suggestions {
                    items: vec![],
                    error: Some(LOCATION_SEARCH_FAILED.to_string()),
                })
            }
        }
    }

    /// Write the candidate back into the form and resolve its UTC offset.
    ///
    /// Coordinates stay set even when the offset lookup fails. An offset that
    /// arrives after a newer selection is discarded.
    pub async fn select(&self, candidate: &PlaceCandidate) -> Option<i64> {
        let ticket = self.select_seq.next();
        let latitude = candidate.y.to_string();
        let longitude = candidate.x.to_string();
        self.page.set_field(FIELD_LOCATION, &candidate.label);
        self.page.set_field(FIELD_LATITUDE, &latitude);
        self.page.set_field(FIELD_LONGITUDE, &longitude);

        if !self.resolve_timezone {
            return None;
        }

        let req = GetTimezoneRequest {
            latitude,
            longitude,
            user_timezone: self.page.client_timezone().unwrap_or_default(),
        };
        let result = self.backend.timezone_offset(&req).await;
        if !self.select_seq.is_latest(ticket) {
            return None;
        }

        match result {
            Ok(offset) => {
                self.page.set_field(FIELD_TIMEZONE_OFFSET, &offset.to_string());
                Some(offset)
            }
            Err(e) => {
                error!("autocomplete: timezone lookup failed ({}): {e}", e.kind);
                self.page.alert(TIMEZONE_FAILED);
                None
            }
        }
    }
}

/// Wire the location input to the geocoder and mount the suggestion menu.
pub(crate) fn attach(
    page: Rc<WebPage>,
    api: Rc<ApiClient>,
    config: &AutocompleteConfig,
) -> Result<(), PageError> {
    let provider = Rc::new(OpenStreetMapProvider::new(
        config.geocoder_url.clone(),
        config.language.clone(),
    ));
    let input = page
        .named::<web_sys::HtmlInputElement>(FIELD_LOCATION)
        .ok_or_else(|| PageError::missing(field_selector(FIELD_LOCATION)))?;
    let auto = Rc::new(LocationAutocomplete::new(page.clone(), provider, api, config.clone())?);

    let host = page.create_div("relative")?;
    input.after_with_node_1(&host).map_err(PageError::dom)?;
    input.set_autocomplete("off");

    let state = MenuState::new();
    leptos::mount::mount_to(host, move || view! { <LocationMenu state=state /> }).forget();

    let debouncer = Debouncer::new(config.debounce_ms());
    {
        let auto = auto.clone();
        let source = input.clone();
        listen(&input, "input", move |_| {
            let auto = auto.clone();
            let source = source.clone();
            debouncer.schedule(move || {
                let query = source.value();
                spawn_local(async move {
                    if let Some(suggestions) = auto.suggest(&query).await {
                        state.show(suggestions);
                    }
                });
            });
        })?;
    }

    listen(&input, "keydown", move |ev| {
        let Some(kev) = ev.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        match kev.key().as_str() {
            "ArrowDown" => state.step(true),
            "ArrowUp" => state.step(false),
            "Enter" => {
                if state.pick_active() {
                    // Keep Enter from submitting the event form.
                    ev.prevent_default();
                }
            }
            "Escape" => state.close(),
            _ => {}
        }
    })?;

    listen(&input, "blur", move |_| state.close())?;

    Effect::new(move |_| {
        let Some(candidate) = state.picked.get() else {
            return;
        };
        let auto = auto.clone();
        spawn_local(async move {
            auto.select(&candidate).await;
        });
    });

    log!("autocomplete: attached to {}", field_selector(FIELD_LOCATION));
    Ok(())
}
