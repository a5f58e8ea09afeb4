use serde::{Deserialize, Serialize};

/// Postal address of a place. The vendor omits most of these fields
/// inconsistently, so everything that is not always present is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub index: Option<String>,
    pub region: String,
    pub district: Option<String>,
    pub city: String,
    pub locality: Option<String>,
    pub street: String,
    pub house: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub visible_address: String,
    pub group_name: String,
}

/// Geographic coordinates of a place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

/// A physical subscriber location with its intercom devices
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: i64,
    pub address: Address,
    pub location: Location,
    pub operator_id: i64,
    pub auto_arming_state: bool,
    pub auto_arming_radius: i64,
}

/// Subscriber account attached to a place
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: i64,
    pub name: String,
    pub account_id: String,
    pub nick_name: Option<String>,
}

/// Guard call-out settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardCallOut {
    pub active: bool,
    pub phone_number: String,
}

/// Payment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub use_link: bool,
}

/// Subscription entry returned by the subscriber-places listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberPlace {
    pub id: i64,
    pub subscriber_type: String,
    pub subscriber_state: String,
    pub place: Place,
    pub subscriber: Subscriber,
    pub guard_call_out: GuardCallOut,
    pub payment: Payment,
    pub provider: String,
    pub blocked: bool,
}
