use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// One geocoding result offered as a suggestion.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct PlaceCandidate {
    pub label: String,
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
}

/// External place search.
pub(crate) trait PlaceProvider {
    async fn search(&self, query: &str, limit: u32) -> ApiResult<Vec<PlaceCandidate>>;
}

/// Nominatim-compatible search endpoint (OpenStreetMap by default).
#[derive(Clone, Debug)]
pub(crate) struct OpenStreetMapProvider {
    pub(crate) url: String,
    pub(crate) language: String,
}

impl OpenStreetMapProvider {
    pub fn new(url: String, language: String) -> Self {
        Self { url, language }
    }

    pub(crate) fn search_url(&self, query: &str, limit: u32) -> String {
        let mut url = format!(
            "{}?format=json&q={}&limit={}",
            self.url,
            urlencoding::encode(query),
            limit
        );
        if !self.language.trim().is_empty() {
            url.push_str("&accept-language=");
            url.push_str(&urlencoding::encode(self.language.trim()));
        }
        url
    }

    /// Rows without a label or with unparsable coordinates are skipped.
    pub(crate) fn parse_search_response(data: serde_json::Value) -> Vec<PlaceCandidate> {
        let list = data.as_array().cloned().unwrap_or_default();

        let mut out: Vec<PlaceCandidate> = Vec::with_capacity(list.len());
        for item in list {
            // Nominatim sends coordinates as strings; accept numbers too.
            let get_f = |k: &str| {
                item.get(k).and_then(|v| {
                    v.as_f64()
                        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
                })
            };

            let label = item
                .get("display_name")
                .or_else(|| item.get("label"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            let (Some(x), Some(y)) = (get_f("lon").or_else(|| get_f("x")), get_f("lat").or_else(|| get_f("y")))
            else {
                continue;
            };

            if label.trim().is_empty() || !x.is_finite() || !y.is_finite() {
                continue;
            }

            out.push(PlaceCandidate { label, x, y });
        }

        out
    }
}

impl PlaceProvider for OpenStreetMapProvider {
    async fn search(&self, query: &str, limit: u32) -> ApiResult<Vec<PlaceCandidate>> {
        let client = reqwest::Client::new();
        let res = client
            .get(self.search_url(query, limit))
            .send()
            .await
            .map_err(ApiError::network)?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::http(status, body, "Place search failed"));
        }

        let data: serde_json::Value = res.json().await.map_err(ApiError::parse)?;
        Ok(Self::parse_search_response(data))
    }
}
