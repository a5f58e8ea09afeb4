use async_trait::async_trait;

use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::{DataEnvelope, Device, OpenResult, SubscriberPlace};

/// Subscriber places and their access-control devices
#[async_trait]
pub trait IntercomApi {
    /// List the places the subscriber is attached to
    async fn list_places(&self) -> ApiResult<Vec<SubscriberPlace>>;

    /// List the access-control devices of a place
    async fn list_devices(&self, place_id: i64) -> ApiResult<Vec<Device>>;

    /// Trigger a door or gate opening on a device
    async fn open_intercom(&self, place_id: i64, device_id: i64) -> ApiResult<OpenResult>;
}

#[async_trait]
impl IntercomApi for Client {
    async fn list_places(&self) -> ApiResult<Vec<SubscriberPlace>> {
        let envelope: DataEnvelope<Vec<SubscriberPlace>> = self
            .get("rest/v3/subscriber-places", RequestOptions::new())
            .await?;
        Ok(envelope.data)
    }

    async fn list_devices(&self, place_id: i64) -> ApiResult<Vec<Device>> {
        let envelope: DataEnvelope<Vec<Device>> = self
            .get(
                &format!("rest/v1/places/{place_id}/accesscontrols"),
                RequestOptions::new(),
            )
            .await?;
        Ok(envelope.data)
    }

    async fn open_intercom(&self, place_id: i64, device_id: i64) -> ApiResult<OpenResult> {
        let body = serde_json::json!({ "name": "accessControlOpen" });
        let envelope: DataEnvelope<OpenResult> = self
            .post(
                &format!("rest/v1/places/{place_id}/accesscontrols/{device_id}/actions"),
                RequestOptions::new().json(body),
            )
            .await?;
        Ok(envelope.data)
    }
}
