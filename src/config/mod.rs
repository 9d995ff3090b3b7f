use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub(crate) struct EditorConfig {
    pub autosave: bool,
    pub autosave_delay_ms: u32,
    /// Ask for a URL when inserting a link instead of leaving a placeholder.
    pub prompt_urls: bool,
    pub history_limit: usize,
    /// Toolbar entry names; unset keeps the default row.
    pub toolbar: Option<Vec<String>>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave: true,
            autosave_delay_ms: 1000,
            prompt_urls: true,
            history_limit: 100,
            toolbar: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub(crate) struct AutocompleteConfig {
    pub delay_ms: u32,
    pub min_length: usize,
    pub limit: u32,
    pub language: String,
    pub geocoder_url: String,
    pub resolve_timezone: bool,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            delay_ms: 750,
            min_length: 3,
            limit: 5,
            language: "en".to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            resolve_timezone: true,
        }
    }
}

impl AutocompleteConfig {
    /// Input debounce, kept within the range the geocoder's usage policy tolerates.
    pub fn debounce_ms(&self) -> u32 {
        self.delay_ms.clamp(500, 1000)
    }
}

/// Runtime configuration injected by the server page as `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct EnvConfig {
    // We support BOTH `API_URL` and `api_url` for compatibility.
    #[serde(rename = "API_URL", alias = "api_url")]
    pub api_url: Option<String>,
    pub editor: EditorConfig,
    pub autocomplete: AutocompleteConfig,
}

impl EnvConfig {
    pub fn new() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let Some(env) = window.get("ENV") else {
            return Self::default();
        };
        if env.is_undefined() || !env.is_object() {
            return Self::default();
        }

        let json = js_sys::JSON::stringify(&env)
            .ok()
            .and_then(|s| s.as_string())
            .unwrap_or_default();

        Self::from_json(&json).unwrap_or_else(|e| {
            leptos::logging::warn!("ignoring malformed window.ENV: {e}");
            Self::default()
        })
    }

    pub(crate) fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Backend base URL without a trailing slash.
    ///
    /// Falls back to the page origin so relative endpoints like `/preview`
    /// hit the server that rendered the page.
    pub fn api_url(&self) -> String {
        let url = match &self.api_url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default(),
        };
        url.trim_end_matches('/').to_string()
    }
}
