use async_trait::async_trait;

use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::{Event, PageEnvelope};

/// Sort direction for event listings, by `occurredAt`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Security event history
#[async_trait]
pub trait EventsApi {
    /// Fetch one page of security events for the given places, sorted by
    /// occurrence time
    async fn list_events(
        &self,
        place_ids: &[i64],
        page: u32,
        sort: SortOrder,
    ) -> ApiResult<Vec<Event>>;
}

#[async_trait]
impl EventsApi for Client {
    async fn list_events(
        &self,
        place_ids: &[i64],
        page: u32,
        sort: SortOrder,
    ) -> ApiResult<Vec<Event>> {
        let options = RequestOptions::new()
            .query("page", page)
            .query("sort", format!("occurredAt,{}", sort.as_str()))
            .json(serde_json::json!({ "placeIds": place_ids }));
        let envelope: PageEnvelope<Event> = self.post("rest/v1/events/search", options).await?;
        Ok(envelope.content)
    }
}
