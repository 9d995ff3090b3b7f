use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// Server-side markdown rendering.
pub(crate) trait PreviewBackend {
    /// POST form-encoded `fields` to `/preview`; returns the rendered HTML fragment.
    async fn render_preview(&self, fields: &[(String, String)]) -> ApiResult<String>;
}

/// UTC offset lookup for a coordinate pair.
pub(crate) trait TimezoneBackend {
    async fn timezone_offset(&self, req: &GetTimezoneRequest) -> ApiResult<i64>;
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct GetTimezoneRequest {
    pub latitude: String,
    pub longitude: String,
    pub user_timezone: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct GetTimezoneResponse {
    pub timezone_offset: i64,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn error_for(res: reqwest::Response, ctx: &str) -> ApiError {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        ApiError::http(status, body, ctx)
    }
}

impl PreviewBackend for ApiClient {
    async fn render_preview(&self, fields: &[(String, String)]) -> ApiResult<String> {
        let client = reqwest::Client::new();
        let res = client
            .post(self.url("/preview"))
            .form(fields)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            res.text().await.map_err(ApiError::parse)
        } else {
            Err(Self::error_for(res, "Preview failed").await)
        }
    }
}

impl TimezoneBackend for ApiClient {
    async fn timezone_offset(&self, req: &GetTimezoneRequest) -> ApiResult<i64> {
        let client = reqwest::Client::new();
        let res = client
            .get(self.url("/gettimezone"))
            .query(req)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            let data: GetTimezoneResponse = res.json().await.map_err(ApiError::parse)?;
            Ok(data.timezone_offset)
        } else {
            Err(Self::error_for(res, "Timezone lookup failed").await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_response_contract_deserialize() {
        let parsed: GetTimezoneResponse =
            serde_json::from_str(r#"{"timezone_offset": 180}"#).expect("should parse");
        assert_eq!(parsed.timezone_offset, 180);

        let negative: GetTimezoneResponse =
            serde_json::from_str(r#"{"timezone_offset": -300}"#).expect("should parse");
        assert_eq!(negative.timezone_offset, -300);
    }

    #[test]
    fn test_timezone_request_serializes_query_keys() {
        let req = GetTimezoneRequest {
            latitude: "59.437".to_string(),
            longitude: "24.7536".to_string(),
            user_timezone: "Europe/Tallinn".to_string(),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["latitude"], "59.437");
        assert_eq!(v["longitude"], "24.7536");
        assert_eq!(v["user_timezone"], "Europe/Tallinn");
    }

    #[test]
    fn test_api_client_joins_paths() {
        let client = ApiClient::new("https://cal.example".to_string());
        assert_eq!(client.url("/preview"), "https://cal.example/preview");
        assert_eq!(client.url("/gettimezone"), "https://cal.example/gettimezone");
    }
}
