pub mod auth;
pub mod code;
pub mod device;
pub mod event;
pub mod place;

// Re-export for convenience
pub use auth::{ErrorPayload, Token};
pub use code::TemporalCode;
pub use device::{Device, OpenResult};
pub use event::{Event, EventSource, EventValue};
pub use place::{Address, GuardCallOut, Location, Payment, Place, Subscriber, SubscriberPlace};

use serde::Deserialize;

/// Envelope for responses wrapped as `{"data": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Envelope for paginated responses wrapped as `{"content": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
}
