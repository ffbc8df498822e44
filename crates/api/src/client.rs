use netdash_core::{
    model::{Health, LiveStats, MonthUsage, UsageStats},
    DashError, Endpoint, MonthCursor, Result,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the monitoring service's local JSON API.
///
/// Cheap to clone: clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http:     reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://127.0.0.1:7373/api`).
    /// `timeout` bounds each request end to end.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("netdash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DashError::Api(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `endpoint`, without query string.
    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    pub async fn health(&self) -> Result<Health> {
        self.get(Endpoint::Health).await
    }

    pub async fn live(&self) -> Result<LiveStats> {
        self.get(Endpoint::Live).await
    }

    pub async fn today(&self) -> Result<UsageStats> {
        self.get(Endpoint::Today).await
    }

    pub async fn summary(&self) -> Result<UsageStats> {
        self.get(Endpoint::Lifetime).await
    }

    pub async fn month(&self, month: MonthCursor) -> Result<MonthUsage> {
        self.get(Endpoint::Month(month)).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let mut request = self.http.get(self.url(endpoint));
        if let Endpoint::Month(month) = endpoint {
            request = request.query(&[("month", month.query_param())]);
        }

        debug!("GET {endpoint}");
        let response = request
            .send()
            .await
            .map_err(|e| DashError::Api(format!("{endpoint}: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Api(format!("{endpoint}: HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DashError::Api(format!("{endpoint}: malformed response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(format!("{}/api/", server.uri()), Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:7373/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:7373/api");
        assert_eq!(client.url(Endpoint::Lifetime), "http://127.0.0.1:7373/api/summary");
    }

    #[tokio::test]
    async fn live_parses_rates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bytes_sent": 1200,
                "bytes_received": 34000,
                "total_bytes": 35200,
                "human_readable": {"sent": "1.20 KB", "received": "34.00 KB", "total": "35.20 KB"}
            })))
            .mount(&server)
            .await;

        let live = client_for(&server).await.live().await.unwrap();
        assert_eq!(live.bytes_sent, 1200);
        assert_eq!(live.bytes_received, 34_000);
    }

    #[tokio::test]
    async fn month_sends_zero_padded_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/month"))
            .and(query_param("month", "2024-03"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "month": "2024-03",
                "days": [
                    {"date": "2024-03-01", "bytes_sent": 10, "bytes_received": 20, "total_bytes": 30},
                    {"date": "2024-03-02", "bytes_sent": 5, "bytes_received": 5, "total_bytes": 10}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let month = MonthCursor::new(2024, 3).unwrap();
        let usage = client_for(&server).await.month(month).await.unwrap();
        assert_eq!(usage.days.len(), 2);
        assert_eq!(usage.days[1].total(), 10);
    }

    #[tokio::test]
    async fn today_and_summary_hit_their_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bytes_sent": 1, "bytes_received": 2, "peak_speed": 4096
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bytes_sent": 100, "bytes_received": 200, "total_bytes": 300
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.today().await.unwrap().peak_speed, Some(4096.0));
        assert_eq!(client.summary().await.unwrap().total(), 300);
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).await.health().await.unwrap_err();
        assert!(matches!(err, DashError::Api(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn malformed_json_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/live"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.live().await.unwrap_err();
        assert!(matches!(err, DashError::Api(msg) if msg.contains("malformed")));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/live"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"bytes_sent": 0, "bytes_received": 0}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            ApiClient::new(format!("{}/api", server.uri()), Some(Duration::from_millis(50))).unwrap();
        assert!(matches!(client.live().await, Err(DashError::Api(_))));
    }
}
