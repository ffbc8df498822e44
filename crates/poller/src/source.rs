use netdash_api::ApiClient;
use netdash_core::{Endpoint, Message, Result};
use std::future::Future;
use tracing::warn;

/// Anything that can turn an [`Endpoint`] into a bus [`Message`].
///
/// Implemented for [`ApiClient`]; tests plug in scripted sources.
pub trait StatsSource: Clone + Send + Sync + 'static {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<Message>> + Send;
}

impl StatsSource for ApiClient {
    fn fetch(&self, endpoint: Endpoint) -> impl Future<Output = Result<Message>> + Send {
        let client = self.clone();
        async move {
            match endpoint {
                Endpoint::Health   => client.health().await.map(Message::HealthLoaded),
                Endpoint::Live     => client.live().await.map(Message::LiveUpdated),
                Endpoint::Today    => client.today().await.map(Message::TodayUpdated),
                Endpoint::Lifetime => client.summary().await.map(Message::LifetimeUpdated),
                Endpoint::Month(month) => client
                    .month(month)
                    .await
                    .map(|usage| Message::MonthLoaded(month, usage)),
            }
        }
    }
}

/// One fetch of `endpoint`. Failures are logged and reported as
/// [`Message::PollFailed`] so the caller keeps whatever it displayed before.
pub async fn fetch<S: StatsSource>(source: &S, endpoint: Endpoint) -> Message {
    match source.fetch(endpoint).await {
        Ok(message) => message,
        Err(e) => {
            warn!("Failed to load {endpoint}: {e}");
            Message::PollFailed(endpoint)
        }
    }
}

/// Everything the manual refresh button reloads. `/health` is included so
/// a dashboard started while the service was down can leave "Offline".
pub fn refresh_endpoints(month: netdash_core::MonthCursor) -> [Endpoint; 5] {
    [
        Endpoint::Health,
        Endpoint::Live,
        Endpoint::Today,
        Endpoint::Lifetime,
        Endpoint::Month(month),
    ]
}
