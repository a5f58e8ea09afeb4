pub mod codes;
pub mod events;
pub mod intercom;

// Re-export for convenience
pub use codes::TemporalCodesApi;
pub use events::{EventsApi, SortOrder};
pub use intercom::IntercomApi;
