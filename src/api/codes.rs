use async_trait::async_trait;

use crate::client::{Client, RequestOptions};
use crate::error::ApiResult;
use crate::models::TemporalCode;

/// Temporary access codes
#[async_trait]
pub trait TemporalCodesApi {
    /// Fetch the temporary access codes issued for the given devices
    async fn list_temporal_codes(&self, device_ids: &[i64]) -> ApiResult<Vec<TemporalCode>>;
}

#[async_trait]
impl TemporalCodesApi for Client {
    async fn list_temporal_codes(&self, device_ids: &[i64]) -> ApiResult<Vec<TemporalCode>> {
        let ids = device_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.get(
            "rest/v1/temporal-codes",
            RequestOptions::new().query("accessControlIds", ids),
        )
        .await
    }
}
