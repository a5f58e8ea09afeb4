//! # Dom.ru Intercom API Client
//!
//! An async Rust client for the Dom.ru (myhome.proptech.ru) residential
//! intercom cloud API with transparent re-authentication.
//!
//! ## Features
//!
//! - Automatic session refresh when the access token expires
//! - Password and refresh-token authentication flows
//! - Typed operations for places, devices, door opening, security events
//!   and temporary access codes
//! - A small typed error taxonomy mirroring the vendor's status/error-code
//!   combinations
//!
//! ## Example
//!
//! ```no_run
//! use domru_api::api::IntercomApi;
//! use domru_api::{Client, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_password("70000000000", "password");
//!     let client = Client::new(config)?;
//!
//!     // The first request authenticates lazily after the vendor's 401.
//!     for subscription in client.list_places().await? {
//!         println!("{}", subscription.place.address.visible_address);
//!
//!         for device in client.list_devices(subscription.place.id).await? {
//!             println!("  {} ({})", device.name, device.device_type);
//!         }
//!     }
//!
//!     // Persist the rotated refresh token for the next run.
//!     let session = client.session().await;
//!     println!("{:?} {:?}", session.refresh_token, session.operator_id);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use client::{Client, ClientConfig, RequestOptions, Session, BASE_URL};
pub use error::{ApiError, ApiResult};
